//! 페이지 와이어링.
//!
//! CLI 호출 하나를 설정 페이지 하나(탭 하나)로 보고 어댑터를 조립한다.

use fruitscan_core::config::AppConfig;
use fruitscan_core::error::CoreError;
use fruitscan_core::ports::data_api::DataApi;
use fruitscan_core::ports::prompt::{PageControl, UserPrompt};
use fruitscan_core::ports::storage::KeyValueStore;
use fruitscan_network::HttpDataClient;
use fruitscan_settings::ambient::AmbientSignal;
use fruitscan_settings::document::DocumentTheme;
use fruitscan_settings::{
    SettingsBus, SettingsController, SettingsStore, ThemeApplier, ThemeSubscription,
};
use fruitscan_storage::StorageArea;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// 조립된 설정 페이지
pub struct Page {
    pub controller: SettingsController,
    pub document: Arc<DocumentTheme>,
    _subscription: ThemeSubscription,
}

impl Page {
    /// 파일 기반 저장소로 페이지 열기
    pub fn open(
        config: &AppConfig,
        storage_path: &Path,
        prompt: Arc<dyn UserPrompt>,
        page: Arc<dyn PageControl>,
    ) -> Result<Self, CoreError> {
        let area = StorageArea::open_sqlite(storage_path)?;
        info!("저장소: {}", storage_path.display());

        let data_api = Arc::new(HttpDataClient::new(
            &config.server.base_url,
            config.request_timeout(),
        )?);
        Ok(Self::assemble(config, &area, data_api, prompt, page))
    }

    /// 주어진 저장 영역과 어댑터로 조립
    ///
    /// 테마 구독을 시작하므로 tokio 런타임 안에서 호출해야 한다.
    pub fn assemble(
        config: &AppConfig,
        area: &StorageArea,
        data_api: Arc<dyn DataApi>,
        prompt: Arc<dyn UserPrompt>,
        page: Arc<dyn PageControl>,
    ) -> Self {
        let local: Arc<dyn KeyValueStore> = Arc::new(area.tab());
        // 세션 저장소는 호출 단위로만 유지
        let session: Arc<dyn KeyValueStore> = Arc::new(StorageArea::in_memory().tab());

        let document = Arc::new(DocumentTheme::new());
        let ambient = Arc::new(AmbientSignal::new(config.ui.ambient));
        let applier = Arc::new(ThemeApplier::new(document.clone(), ambient));

        let bus = SettingsBus::default();
        let subscription = applier.listen(local.clone(), &bus);
        let store = Arc::new(SettingsStore::new(local, applier, bus));

        let controller = SettingsController::new(store, prompt, data_api, page)
            .with_session_storage(session)
            .with_reload_delay(config.reload_delay());

        Self {
            controller,
            document,
            _subscription: subscription,
        }
    }
}
