//! HTTP REST API 클라이언트.
//!
//! `DataApi` 포트 구현. 전체 삭제는 파괴적 요청이므로 재시도하지 않는다.

use async_trait::async_trait;
use fruitscan_core::error::CoreError;
use fruitscan_core::models::model::ModelCatalog;
use fruitscan_core::ports::data_api::DataApi;
use std::time::Duration;
use tracing::{debug, warn};

/// 전체 데이터 삭제 경로
const CLEAR_ALL_PATH: &str = "/api/data/clear-all";

/// 모델 정보 경로
const MODEL_INFO_PATH: &str = "/api/models/info";

/// 백엔드 데이터 API 클라이언트: `DataApi` 포트 구현
pub struct HttpDataClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDataClient {
    /// 새 HTTP 클라이언트 생성
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 기본 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 응답 상태 코드 확인 및 에러 매핑
    async fn check_response(
        &self,
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, CoreError> {
        let status = resp.status();

        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_else(|e| {
            warn!("응답 본문 읽기 실패: {e}");
            String::new()
        });

        match status.as_u16() {
            404 => Err(CoreError::NotFound {
                resource_type: "API".to_string(),
                id: text,
            }),
            503 => Err(CoreError::ServiceUnavailable(text)),
            _ => Err(CoreError::Internal(format!("API 에러 ({status}): {text}"))),
        }
    }
}

#[async_trait]
impl DataApi for HttpDataClient {
    async fn clear_all_data(&self) -> Result<(), CoreError> {
        let url = format!("{}{}", self.base_url, CLEAR_ALL_PATH);
        debug!("서버 데이터 전체 삭제 요청: {url}");

        let resp = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("데이터 삭제 요청 실패: {e}")))?;

        self.check_response(resp).await?;
        debug!("서버 데이터 전체 삭제 성공");
        Ok(())
    }

    async fn model_info(&self) -> Result<ModelCatalog, CoreError> {
        let url = format!("{}{}", self.base_url, MODEL_INFO_PATH);
        debug!("모델 정보 요청: {url}");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("모델 정보 요청 실패: {e}")))?;

        let resp = self.check_response(resp).await?;
        resp.json::<ModelCatalog>()
            .await
            .map_err(|e| CoreError::Internal(format!("모델 정보 응답 파싱 실패: {e}")))
    }
}
