//! 애플리케이션 설정 구조체.
//!
//! 백엔드 서버 URL, 로컬 저장소 경로, 테마 호스트 환경 설정 등
//! 런타임 설정을 정의한다. `config` crate를 통해 파일/환경변수에서 로드.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::models::theme::ThemeMode;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 서버 연결 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 로컬 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 화면(테마/리로드) 설정
    #[serde(default)]
    pub ui: UiConfig,
}

// ============================================================
// 서버 설정
// ============================================================

/// 백엔드 서버 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// API 기본 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

// ============================================================
// 저장소 설정
// ============================================================

/// 로컬 저장소 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite 저장소 파일 경로 (None이면 플랫폼 데이터 디렉토리)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// ============================================================
// 화면 설정
// ============================================================

/// 테마 호스트 환경 및 리로드 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// 주변(OS) 색상 선호: `auto` 테마 해석에 사용
    #[serde(default = "default_ambient")]
    pub ambient: ThemeMode,
    /// 전체 데이터 삭제 후 리로드까지 대기 시간 (밀리초)
    #[serde(default = "default_reload_delay_ms")]
    pub reload_delay_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            ambient: default_ambient(),
            reload_delay_ms: default_reload_delay_ms(),
        }
    }
}

fn default_ambient() -> ThemeMode {
    ThemeMode::Light
}

fn default_reload_delay_ms() -> u64 {
    2_000
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            ui: UiConfig::default(),
        }
    }

    /// 요청 타임아웃 Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }

    /// 리로드 대기 Duration
    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(self.ui.reload_delay_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"server":{"base_url":"http://scanner:8000"}}"#).unwrap();
        assert_eq!(config.server.base_url, "http://scanner:8000");
        assert_eq!(config.server.request_timeout_ms, 10_000);
        assert_eq!(config.ui.reload_delay_ms, 2_000);
    }

    #[test]
    fn duration_conversions() {
        let config = AppConfig::default_config();
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.reload_delay(), Duration::from_secs(2));
    }

    #[test]
    fn ambient_parses_lowercase() {
        let config: AppConfig = serde_json::from_str(r#"{"ui":{"ambient":"dark"}}"#).unwrap();
        assert_eq!(config.ui.ambient, ThemeMode::Dark);
    }
}
