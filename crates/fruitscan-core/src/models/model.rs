//! 분류 모델 정보.
//!
//! 설정 페이지의 모델 카드에 표시되는 버전, 정확도, 갱신일.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 모델 카드 정보
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub version: String,
    /// 정확도 (%)
    pub accuracy: f64,
    pub last_updated: String,
}

/// 모델 이름 → 카드 정보
pub type ModelCatalog = BTreeMap<String, ModelInfo>;
