//! 사용자 설정 모델.
//!
//! 설정 슬롯에 JSON으로 저장되는 9개 필드의 평평한 레코드.
//! 저장된 객체와 기본값의 병합 규칙도 여기서 정의한다.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use super::theme::ThemePreference;
use crate::error::CoreError;

/// 기본 분류 모델
pub const DEFAULT_MODEL: &str = "FAVDD";

/// 백엔드가 제공하는 분류 모델 목록
pub const KNOWN_MODELS: &[&str] = &["FAVDD", "Olive", "Apple", "Citrus", "Potato", "Tomato"];

/// 설정 레코드의 알려진 필드 (직렬화 키)
pub const KNOWN_FIELDS: [&str; 9] = [
    "defaultModel",
    "confidenceThreshold",
    "autoSave",
    "showHeatmap",
    "theme",
    "language",
    "animationSpeed",
    "dataRetention",
    "analytics",
];

/// 애니메이션 속도 (표시 전용)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl AnimationSpeed {
    /// 직렬화 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Normal => "normal",
            Self::Fast => "fast",
        }
    }
}

impl fmt::Display for AnimationSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimationSpeed {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slow" => Ok(Self::Slow),
            "normal" => Ok(Self::Normal),
            "fast" => Ok(Self::Fast),
            other => Err(CoreError::Validation {
                field: "animationSpeed".to_string(),
                message: format!("알 수 없는 값: {other}"),
            }),
        }
    }
}

/// 사용자 설정
///
/// 병합 후에는 항상 9개 필드를 모두 가진다. 알 수 없는 키는 `extra`에
/// 그대로 보존되어 저장 시 함께 직렬화된다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// 기본 분류 모델 식별자
    pub default_model: String,
    /// 낮은 신뢰도 경고 기준 (0-100 %)
    pub confidence_threshold: u8,
    /// 분석 결과 자동 저장
    pub auto_save: bool,
    /// 분석 후 히트맵 자동 표시
    pub show_heatmap: bool,
    /// 테마 선호
    pub theme: ThemePreference,
    /// UI 로케일 코드
    pub language: String,
    /// 애니메이션 속도
    pub animation_speed: AnimationSpeed,
    /// 데이터 보존 기간 (일, 서버에서 적용)
    pub data_retention: u32,
    /// 사용 통계 수집 동의
    pub analytics: bool,
    /// 알 수 없는 필드 (상위 호환)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_model: DEFAULT_MODEL.to_string(),
            confidence_threshold: 50,
            auto_save: true,
            show_heatmap: false,
            theme: ThemePreference::Light,
            language: "en".to_string(),
            animation_speed: AnimationSpeed::Normal,
            data_retention: 30,
            analytics: true,
            extra: Map::new(),
        }
    }
}

impl Settings {
    /// 저장된 객체를 기본값 위에 병합한다.
    ///
    /// 저장된 키가 기본값을 덮어쓰고, 없는 키는 기본값을 유지한다.
    /// 해석할 수 없는 알려진 필드는 해당 필드만 기본값으로 남는다.
    pub fn merge_stored(stored: &Map<String, Value>) -> Self {
        let mut settings = Self::default();
        for (key, value) in stored {
            if let Err(e) = settings.apply_field(key, value) {
                warn!("저장된 설정 필드 무시, 기본값 사용: {e}");
            }
        }
        settings
    }

    /// 단일 필드 설정 (JSON 값)
    ///
    /// 알 수 없는 키는 `extra`에 보관된다.
    pub fn apply_field(&mut self, key: &str, value: &Value) -> Result<(), CoreError> {
        let invalid = || CoreError::Validation {
            field: key.to_string(),
            message: format!("해석할 수 없는 값: {value}"),
        };

        match key {
            "defaultModel" => self.default_model = value.as_str().ok_or_else(invalid)?.to_string(),
            "confidenceThreshold" => {
                self.confidence_threshold = lenient_integer(value)
                    .filter(|v| *v <= 100)
                    .and_then(|v| u8::try_from(v).ok())
                    .ok_or_else(invalid)?
            }
            "autoSave" => self.auto_save = value.as_bool().ok_or_else(invalid)?,
            "showHeatmap" => self.show_heatmap = value.as_bool().ok_or_else(invalid)?,
            "theme" => self.theme = value.as_str().ok_or_else(invalid)?.parse()?,
            "language" => self.language = value.as_str().ok_or_else(invalid)?.to_string(),
            "animationSpeed" => {
                self.animation_speed = value.as_str().ok_or_else(invalid)?.parse()?
            }
            "dataRetention" => {
                self.data_retention = lenient_integer(value)
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(invalid)?
            }
            "analytics" => self.analytics = value.as_bool().ok_or_else(invalid)?,
            _ => {
                self.extra.insert(key.to_string(), value.clone());
            }
        }
        Ok(())
    }

    /// 문자열 입력으로 단일 필드 설정 (폼 컨트롤/CLI 입력)
    pub fn set_field(&mut self, key: &str, raw: &str) -> Result<(), CoreError> {
        if !KNOWN_FIELDS.contains(&key) {
            return Err(CoreError::Validation {
                field: key.to_string(),
                message: "알 수 없는 설정 필드".to_string(),
            });
        }

        let value = match key {
            "autoSave" | "showHeatmap" | "analytics" => match raw {
                "true" | "on" | "1" => Value::Bool(true),
                "false" | "off" | "0" => Value::Bool(false),
                _ => Value::String(raw.to_string()),
            },
            _ => Value::String(raw.to_string()),
        };
        self.apply_field(key, &value)
    }

    /// 예측 신뢰도(%)가 경고 기준보다 낮은지
    pub fn is_low_confidence(&self, confidence_percent: f64) -> bool {
        confidence_percent < f64::from(self.confidence_threshold)
    }

    /// 기본 모델이 알려진 분류 모델인지
    pub fn has_known_model(&self) -> bool {
        KNOWN_MODELS.contains(&self.default_model.as_str())
    }
}

/// JSON 숫자 또는 숫자 문자열을 정수로 해석 (슬라이더 값은 문자열로 저장된 이력이 있음)
fn lenient_integer(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole_number)),
        Value::String(s) => {
            let s = s.trim();
            s.parse()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole_number))
        }
        _ => None,
    }
}

/// 소수부가 0인 음이 아닌 실수만 정수로 (`75.0` → 75)
fn whole_number(f: f64) -> Option<u64> {
    (f >= 0.0 && f.fract() == 0.0).then(|| f as u64)
}
