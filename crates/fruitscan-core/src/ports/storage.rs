//! 클라이언트 로컬 키-값 저장소 포트.
//!
//! 구현: `fruitscan-storage` crate (인메모리, rusqlite)

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::CoreError;

/// 저장소 변경 알림 (다른 탭으로 전달되는 신호)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    /// 변경된 키 (None이면 전체 삭제)
    pub key: Option<String>,
    /// 새 값 (None이면 삭제)
    pub new_value: Option<String>,
    /// 변경을 일으킨 저장소 핸들 ID
    pub origin: Uuid,
}

impl StorageChange {
    /// 지정한 키에 대한 변경인지
    pub fn is_for(&self, key: &str) -> bool {
        self.key.as_deref() == Some(key)
    }
}

/// 로컬 키-값 저장소 (탭 하나의 핸들)
///
/// 같은 저장 영역을 공유하는 모든 핸들은 `subscribe`로 변경을 받는다.
/// 자신이 일으킨 변경도 포함되므로 수신 측에서 `origin`으로 걸러낸다.
pub trait KeyValueStore: Send + Sync {
    /// 이 핸들의 고유 ID
    fn origin(&self) -> Uuid;

    /// 값 조회
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// 값 저장 (덮어쓰기)
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// 키 삭제
    fn remove(&self, key: &str) -> Result<(), CoreError>;

    /// 전체 삭제
    fn clear(&self) -> Result<(), CoreError>;

    /// 저장된 키 목록
    fn keys(&self) -> Result<Vec<String>, CoreError>;

    /// 변경 알림 구독
    fn subscribe(&self) -> broadcast::Receiver<StorageChange>;
}
