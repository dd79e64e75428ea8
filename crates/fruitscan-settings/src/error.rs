//! 설정 서브시스템 에러.

use fruitscan_core::error::CoreError;
use thiserror::Error;

/// 설정 작업 에러
///
/// 어느 경우에도 기존 상태는 유지되며 페이지는 계속 동작한다.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// 가져온 파일이 설정 객체 JSON이 아님: 저장된 설정은 그대로
    #[error("설정 파일 형식 오류: {0}")]
    InvalidImportFormat(String),

    /// 원격 작업 실패: 로컬 데이터는 삭제하지 않음
    #[error("원격 작업 실패: {0}")]
    RemoteOperationFailed(#[source] CoreError),

    /// 로컬 저장소 에러
    #[error(transparent)]
    Storage(#[from] CoreError),
}
