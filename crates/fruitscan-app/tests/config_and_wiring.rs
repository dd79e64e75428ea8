//! 설정 및 DI 와이어링 통합 테스트.
//!
//! AppConfig → 어댑터 생성 검증.

use fruitscan_core::config::AppConfig;
use fruitscan_core::models::theme::ThemeMode;
use fruitscan_network::HttpDataClient;
use fruitscan_storage::StorageArea;

#[test]
fn config_defaults_are_valid() {
    let config = AppConfig::default_config();

    assert!(!config.server.base_url.is_empty());
    assert!(config.server.request_timeout_ms > 0);
    assert_eq!(config.ui.ambient, ThemeMode::Light);
    assert_eq!(config.reload_delay().as_secs(), 2);
}

#[test]
fn all_adapters_instantiate_from_config() {
    let config = AppConfig::default_config();

    let client = HttpDataClient::new(&config.server.base_url, config.request_timeout()).unwrap();
    assert_eq!(client.base_url(), "http://localhost:5000");

    let dir = tempfile::tempdir().unwrap();
    let _area = StorageArea::open_sqlite(&dir.path().join("nested").join("fruitscan.db")).unwrap();
}

#[test]
fn config_serde_roundtrip() {
    let mut config = AppConfig::default_config();
    config.ui.ambient = ThemeMode::Dark;

    let json = serde_json::to_string(&config).unwrap();
    let deserialized: AppConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.ui.ambient, ThemeMode::Dark);
    assert_eq!(deserialized.server.base_url, config.server.base_url);
}
