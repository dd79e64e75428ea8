//! 설정 로드.
//!
//! 기본값 → 플랫폼 설정 디렉토리의 `config.json` (선택) → `FRUITSCAN__*` 환경변수
//! 순으로 덮어쓴다. CLI 인자는 호출 측에서 마지막에 적용한다.

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use fruitscan_core::config::AppConfig;
use fruitscan_core::error::CoreError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 설정 파일 이름
const CONFIG_FILE_NAME: &str = "config.json";

/// 저장소 파일 이름
const STORAGE_FILE_NAME: &str = "fruitscan.db";

/// 환경변수 접두사 (`FRUITSCAN__SERVER__BASE_URL` 형태)
const ENV_PREFIX: &str = "FRUITSCAN";

/// 플랫폼별 앱 디렉토리
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "fruitscan", "fruitscan")
}

/// 플랫폼별 기본 설정 파일 경로
///
/// - macOS: `~/Library/Application Support/com.fruitscan.fruitscan/config.json`
/// - Windows: `%APPDATA%\fruitscan\fruitscan\config\config.json`
/// - Linux: `~/.config/fruitscan/config.json`
pub fn default_config_file() -> Option<PathBuf> {
    project_dirs().map(|p| p.config_dir().join(CONFIG_FILE_NAME))
}

/// 설정 로드 (프로세스 환경변수 사용)
pub fn load_config(config_file: Option<&Path>) -> Result<AppConfig, CoreError> {
    build_config(
        config_file,
        Environment::with_prefix(ENV_PREFIX).separator("__"),
    )
}

fn build_config(config_file: Option<&Path>, env: Environment) -> Result<AppConfig, CoreError> {
    let defaults = Config::try_from(&AppConfig::default_config()).map_err(config_error)?;

    let mut builder = Config::builder().add_source(defaults);
    if let Some(path) = config_file {
        debug!("설정 파일: {}", path.display());
        builder = builder.add_source(File::from(path).required(false));
    }

    builder
        .add_source(env)
        .build()
        .and_then(Config::try_deserialize)
        .map_err(config_error)
}

fn config_error(e: ConfigError) -> CoreError {
    CoreError::Config(format!("설정 로드 실패: {e}"))
}

/// 저장소 파일 경로 결정 (설정값 또는 플랫폼별 데이터 디렉토리)
pub fn resolve_storage_path(config: &AppConfig) -> PathBuf {
    config
        .storage
        .path
        .clone()
        .or_else(|| project_dirs().map(|p| p.data_dir().join(STORAGE_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(STORAGE_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fruitscan_core::models::theme::ThemeMode;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .source(Some(map))
    }

    #[test]
    fn defaults_without_sources() {
        let config = build_config(None, env(&[])).unwrap();
        assert_eq!(config.server.base_url, "http://localhost:5000");
        assert_eq!(config.ui.reload_delay_ms, 2_000);
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn missing_file_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = build_config(Some(&path), env(&[])).unwrap();
        assert_eq!(config.server.request_timeout_ms, 10_000);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            r#"{"server":{"base_url":"http://scanner:8000"},"ui":{"ambient":"dark"}}"#,
        )
        .unwrap();

        let config = build_config(Some(&path), env(&[])).unwrap();
        assert_eq!(config.server.base_url, "http://scanner:8000");
        assert_eq!(config.ui.ambient, ThemeMode::Dark);
        assert_eq!(config.ui.reload_delay_ms, 2_000);
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{"server":{"base_url":"http://scanner:8000"}}"#).unwrap();

        let config = build_config(
            Some(&path),
            env(&[
                ("FRUITSCAN__SERVER__BASE_URL", "http://env:9000"),
                ("FRUITSCAN__UI__RELOAD_DELAY_MS", "500"),
            ]),
        )
        .unwrap();
        assert_eq!(config.server.base_url, "http://env:9000");
        assert_eq!(config.ui.reload_delay_ms, 500);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{not json").unwrap();

        let err = build_config(Some(&path), env(&[])).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn explicit_storage_path_wins() {
        let mut config = AppConfig::default_config();
        config.storage.path = Some(PathBuf::from("/tmp/custom.db"));
        assert_eq!(
            resolve_storage_path(&config),
            PathBuf::from("/tmp/custom.db")
        );

        config.storage.path = None;
        assert!(resolve_storage_path(&config).ends_with(STORAGE_FILE_NAME));
    }
}
