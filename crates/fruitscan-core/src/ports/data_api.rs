//! 백엔드 데이터 API 포트.
//!
//! 구현: `fruitscan-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::model::ModelCatalog;

/// 서버 측 데이터 관리 API
#[async_trait]
pub trait DataApi: Send + Sync {
    /// 서버의 모든 데이터 삭제 (예측 이력, 캐시 이미지 등)
    ///
    /// 성공 응답일 때만 `Ok`를 반환한다.
    async fn clear_all_data(&self) -> Result<(), CoreError>;

    /// 분류 모델별 카드 정보 조회
    async fn model_info(&self) -> Result<ModelCatalog, CoreError>;
}
