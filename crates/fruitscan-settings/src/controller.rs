//! 설정 페이지 동작.
//!
//! 설정 저장소 위에 사용자 확인 절차, 토스트 안내, 전체 데이터 삭제
//! (원격 성공 후에만 로컬 삭제) 순서를 얹는다.

use fruitscan_core::models::model::ModelCatalog;
use fruitscan_core::models::settings::Settings;
use fruitscan_core::ports::data_api::DataApi;
use fruitscan_core::ports::prompt::{PageControl, UserPrompt};
use fruitscan_core::ports::storage::KeyValueStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::error::SettingsError;
use crate::store::{ExportedSettings, SettingsStore};

/// 전체 삭제 후 리로드까지 기본 대기 시간
const DEFAULT_RELOAD_DELAY: Duration = Duration::from_secs(2);

const RESET_CONFIRM: &str = "Are you sure you want to reset all settings to defaults?";
const CLEAR_ALL_CONFIRM: &str = "Are you sure you want to clear ALL data? This will remove:\n\
    - Prediction history\n\
    - Cached images\n\
    - User preferences\n\n\
    This action cannot be undone.";

const SAVED_TOAST: &str = "Settings saved successfully!";
const LANGUAGE_TOAST: &str =
    "Language setting saved. Restart the application to apply changes.";
const RESET_TOAST: &str = "Settings reset to defaults";
const EXPORTED_TOAST: &str = "Settings exported successfully";
const IMPORTED_TOAST: &str = "Settings imported successfully";
const IMPORT_FAILED_TOAST: &str = "Error importing settings. Please check the file format.";
const CLEARED_TOAST: &str = "All data cleared successfully";
const CLEAR_FAILED_TOAST: &str = "Error clearing data. Please try again.";

/// 파괴적 작업 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// 실행됨
    Completed,
    /// 사용자가 확인을 거절: 아무것도 하지 않음
    Declined,
}

/// 설정 페이지 컨트롤러
pub struct SettingsController {
    store: Arc<SettingsStore>,
    prompt: Arc<dyn UserPrompt>,
    data_api: Arc<dyn DataApi>,
    page: Arc<dyn PageControl>,
    session_storage: Option<Arc<dyn KeyValueStore>>,
    reload_delay: Duration,
}

impl SettingsController {
    /// 새 컨트롤러 생성
    pub fn new(
        store: Arc<SettingsStore>,
        prompt: Arc<dyn UserPrompt>,
        data_api: Arc<dyn DataApi>,
        page: Arc<dyn PageControl>,
    ) -> Self {
        Self {
            store,
            prompt,
            data_api,
            page,
            session_storage: None,
            reload_delay: DEFAULT_RELOAD_DELAY,
        }
    }

    /// 전체 삭제 시 함께 비울 세션 저장소
    pub fn with_session_storage(mut self, storage: Arc<dyn KeyValueStore>) -> Self {
        self.session_storage = Some(storage);
        self
    }

    /// 전체 삭제 후 리로드 대기 시간
    pub fn with_reload_delay(mut self, delay: Duration) -> Self {
        self.reload_delay = delay;
        self
    }

    /// 설정 저장소
    pub fn store(&self) -> &Arc<SettingsStore> {
        &self.store
    }

    /// 페이지 초기화: 조기 테마 적용 후 병합된 설정으로 다시 적용
    ///
    /// 반환된 설정으로 폼 컨트롤을 채운다.
    pub fn initialize(&self) -> Settings {
        let applier = self.store.applier();
        applier.apply_early(self.store.storage().as_ref());

        let settings = self.store.load();
        applier.apply(settings.theme);
        settings
    }

    /// 폼 컨트롤 변경: 조용히 전체 저장
    pub fn change_control(&self, settings: &Settings) {
        if let Err(e) = self.store.save(settings) {
            warn!("컨트롤 변경 저장 실패: {e}");
        }
    }

    /// 저장 버튼
    pub async fn save_settings(&self, settings: &Settings) -> Result<(), SettingsError> {
        self.store.save(settings)?;
        self.prompt.show_toast(SAVED_TOAST).await;
        Ok(())
    }

    /// 언어 변경: 저장 후 재시작 안내
    pub async fn change_language(&self, settings: &Settings) {
        self.change_control(settings);
        self.prompt.show_toast(LANGUAGE_TOAST).await;
    }

    /// 기본값으로 초기화 (확인 필요)
    pub async fn reset_settings(&self) -> Result<ActionOutcome, SettingsError> {
        if !self.prompt.confirm(RESET_CONFIRM).await {
            info!("설정 초기화 취소");
            return Ok(ActionOutcome::Declined);
        }

        self.store.reset()?;
        self.prompt.show_toast(RESET_TOAST).await;
        Ok(ActionOutcome::Completed)
    }

    /// 내보내기
    pub async fn export_settings(&self) -> Result<ExportedSettings, SettingsError> {
        let exported = self.store.export()?;
        self.prompt.show_toast(EXPORTED_TOAST).await;
        Ok(exported)
    }

    /// 가져오기: 실패 시 안내 후 에러 반환, 저장된 설정은 유지
    pub async fn import_settings(&self, contents: &str) -> Result<Settings, SettingsError> {
        match self.store.import(contents) {
            Ok(settings) => {
                self.prompt.show_toast(IMPORTED_TOAST).await;
                Ok(settings)
            }
            Err(e) => {
                error!("설정 가져오기 실패: {e}");
                self.prompt.show_toast(IMPORT_FAILED_TOAST).await;
                Err(e)
            }
        }
    }

    /// 전체 데이터 삭제 (확인 필요)
    ///
    /// 서버 삭제가 성공한 경우에만 로컬 저장소를 비우고 리로드를 예약한다.
    /// 서버 삭제가 실패하면 로컬 데이터는 건드리지 않는다.
    pub async fn clear_all_data(&self) -> Result<ActionOutcome, SettingsError> {
        if !self.prompt.confirm(CLEAR_ALL_CONFIRM).await {
            info!("전체 데이터 삭제 취소");
            return Ok(ActionOutcome::Declined);
        }

        if let Err(e) = self.data_api.clear_all_data().await {
            error!("서버 데이터 삭제 실패: {e}");
            self.prompt.show_toast(CLEAR_FAILED_TOAST).await;
            return Err(SettingsError::RemoteOperationFailed(e));
        }

        if let Err(e) = self.clear_local() {
            error!("로컬 데이터 삭제 실패: {e}");
            self.prompt.show_toast(CLEAR_FAILED_TOAST).await;
            return Err(e);
        }

        self.prompt.show_toast(CLEARED_TOAST).await;
        self.page.schedule_reload(self.reload_delay);
        Ok(ActionOutcome::Completed)
    }

    /// 모델 카드 정보 갱신
    ///
    /// 실패는 로그만 남기고 사용자에게 알리지 않는다 (카드는 기존 표시 유지).
    pub async fn refresh_model_info(&self) -> Option<ModelCatalog> {
        match self.data_api.model_info().await {
            Ok(catalog) => {
                debug!("모델 정보 {}개 수신", catalog.len());
                Some(catalog)
            }
            Err(e) => {
                error!("모델 정보 갱신 실패: {e}");
                None
            }
        }
    }

    fn clear_local(&self) -> Result<(), SettingsError> {
        self.store.clear_local()?;
        if let Some(session) = &self.session_storage {
            session.clear()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambient::AmbientSignal;
    use crate::bus::SettingsBus;
    use crate::store::SETTINGS_KEY;
    use crate::theme::ThemeApplier;
    use crate::document::DocumentTheme;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use fruitscan_core::error::CoreError;
    use fruitscan_core::models::model::ModelInfo;
    use fruitscan_core::models::theme::{ThemeMode, ThemePreference};
    use fruitscan_core::ports::storage::StorageChange;
    use fruitscan_core::ports::theme_target::ThemeTarget;
    use fruitscan_storage::{StorageArea, TabStorage};
    use tokio::sync::broadcast;
    use uuid::Uuid;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 미리 정한 답을 하고 토스트를 기록하는 프롬프트
    struct ScriptedPrompt {
        answer: bool,
        confirmations: Mutex<Vec<String>>,
        toasts: Mutex<Vec<String>>,
    }

    impl ScriptedPrompt {
        fn answering(answer: bool) -> Arc<Self> {
            Arc::new(Self {
                answer,
                confirmations: Mutex::new(Vec::new()),
                toasts: Mutex::new(Vec::new()),
            })
        }

        fn toasts(&self) -> Vec<String> {
            self.toasts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl UserPrompt for ScriptedPrompt {
        async fn confirm(&self, message: &str) -> bool {
            self.confirmations.lock().unwrap().push(message.to_string());
            self.answer
        }

        async fn show_toast(&self, message: &str) {
            self.toasts.lock().unwrap().push(message.to_string());
        }
    }

    struct FakeDataApi {
        succeed: bool,
        calls: AtomicUsize,
    }

    impl FakeDataApi {
        fn new(succeed: bool) -> Arc<Self> {
            Arc::new(Self {
                succeed,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl DataApi for FakeDataApi {
        async fn clear_all_data(&self) -> Result<(), CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                Ok(())
            } else {
                Err(CoreError::Network("connection refused".to_string()))
            }
        }

        async fn model_info(&self) -> Result<ModelCatalog, CoreError> {
            if self.succeed {
                let mut catalog = ModelCatalog::new();
                catalog.insert(
                    "FAVDD".to_string(),
                    ModelInfo {
                        version: "2.1".to_string(),
                        accuracy: 94.5,
                        last_updated: "2024-03-01".to_string(),
                    },
                );
                Ok(catalog)
            } else {
                Err(CoreError::ServiceUnavailable("maintenance".to_string()))
            }
        }
    }

    #[derive(Default)]
    struct RecordingPage {
        reload: Mutex<Option<Duration>>,
        scheduled: AtomicBool,
    }

    impl PageControl for RecordingPage {
        fn schedule_reload(&self, delay: Duration) {
            *self.reload.lock().unwrap() = Some(delay);
            self.scheduled.store(true, Ordering::SeqCst);
        }
    }

    struct Fixture {
        controller: SettingsController,
        prompt: Arc<ScriptedPrompt>,
        api: Arc<FakeDataApi>,
        page: Arc<RecordingPage>,
        doc: Arc<DocumentTheme>,
        local: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
    }

    fn fixture(confirm: bool, remote_ok: bool) -> Fixture {
        let local: Arc<dyn KeyValueStore> = Arc::new(StorageArea::in_memory().tab());
        let session: Arc<dyn KeyValueStore> = Arc::new(StorageArea::in_memory().tab());
        let doc = Arc::new(DocumentTheme::new());
        let applier = Arc::new(ThemeApplier::new(
            doc.clone(),
            Arc::new(AmbientSignal::new(ThemeMode::Dark)),
        ));
        let store = Arc::new(SettingsStore::new(
            local.clone(),
            applier,
            SettingsBus::default(),
        ));

        let prompt = ScriptedPrompt::answering(confirm);
        let api = FakeDataApi::new(remote_ok);
        let page = Arc::new(RecordingPage::default());
        let controller = SettingsController::new(store, prompt.clone(), api.clone(), page.clone())
            .with_session_storage(session.clone());

        Fixture {
            controller,
            prompt,
            api,
            page,
            doc,
            local,
            session,
        }
    }

    fn seed(f: &Fixture) {
        f.local
            .set(SETTINGS_KEY, r#"{"theme":"dark","language":"ko"}"#)
            .unwrap();
        f.local.set("predictionCache", "[]").unwrap();
        f.session.set("uploadDraft", "{}").unwrap();
    }

    #[test]
    fn initialize_applies_merged_theme() {
        let f = fixture(true, true);
        f.local.set(SETTINGS_KEY, r#"{"theme":"auto"}"#).unwrap();

        let settings = f.controller.initialize();
        assert_eq!(settings.theme, ThemePreference::Auto);
        assert_eq!(f.doc.current_theme(), Some(ThemeMode::Dark));
    }

    #[tokio::test]
    async fn save_button_toasts() {
        let f = fixture(true, true);
        let settings = Settings {
            analytics: false,
            ..Settings::default()
        };
        f.controller.save_settings(&settings).await.unwrap();

        assert!(!f.controller.store().load().analytics);
        assert_eq!(f.prompt.toasts(), vec![SAVED_TOAST.to_string()]);
    }

    #[tokio::test]
    async fn language_change_saves_and_hints_restart() {
        let f = fixture(true, true);
        let settings = Settings {
            language: "es".to_string(),
            ..Settings::default()
        };
        f.controller.change_language(&settings).await;

        assert_eq!(f.controller.store().load().language, "es");
        assert_eq!(f.prompt.toasts(), vec![LANGUAGE_TOAST.to_string()]);
    }

    #[tokio::test]
    async fn reset_declined_keeps_settings() {
        let f = fixture(false, true);
        seed(&f);

        let outcome = f.controller.reset_settings().await.unwrap();
        assert_eq!(outcome, ActionOutcome::Declined);
        assert!(f.local.get(SETTINGS_KEY).unwrap().is_some());
        assert!(f.prompt.toasts().is_empty());
        assert_eq!(
            f.prompt.confirmations.lock().unwrap().as_slice(),
            &[RESET_CONFIRM.to_string()]
        );
    }

    #[tokio::test]
    async fn reset_confirmed_removes_slot_only() {
        let f = fixture(true, true);
        seed(&f);

        let outcome = f.controller.reset_settings().await.unwrap();
        assert_eq!(outcome, ActionOutcome::Completed);
        assert_eq!(f.local.get(SETTINGS_KEY).unwrap(), None);
        assert!(f.local.get("predictionCache").unwrap().is_some());
        assert_eq!(f.controller.store().load(), Settings::default());
        assert_eq!(f.prompt.toasts(), vec![RESET_TOAST.to_string()]);
    }

    #[tokio::test]
    async fn import_failure_toasts_and_keeps_slot() {
        let f = fixture(true, true);
        seed(&f);
        let before = f.local.get(SETTINGS_KEY).unwrap();

        let result = f.controller.import_settings("not json at all").await;
        assert_matches!(result, Err(SettingsError::InvalidImportFormat(_)));
        assert_eq!(f.local.get(SETTINGS_KEY).unwrap(), before);
        assert_eq!(f.prompt.toasts(), vec![IMPORT_FAILED_TOAST.to_string()]);
    }

    #[tokio::test]
    async fn import_success_toasts() {
        let f = fixture(true, true);
        let settings = f
            .controller
            .import_settings(r#"{"theme":"light","dataRetention":14}"#)
            .await
            .unwrap();
        assert_eq!(settings.data_retention, 14);
        assert_eq!(f.doc.current_theme(), Some(ThemeMode::Light));
        assert_eq!(f.prompt.toasts(), vec![IMPORTED_TOAST.to_string()]);
    }

    #[tokio::test]
    async fn export_toasts() {
        let f = fixture(true, true);
        let exported = f.controller.export_settings().await.unwrap();
        assert!(exported.file_name.starts_with("fruit-scanner-settings-"));
        assert!(exported.file_name.ends_with(".json"));
        assert_eq!(f.prompt.toasts(), vec![EXPORTED_TOAST.to_string()]);
    }

    #[tokio::test]
    async fn clear_all_declined_skips_remote() {
        let f = fixture(false, true);
        seed(&f);

        let outcome = f.controller.clear_all_data().await.unwrap();
        assert_eq!(outcome, ActionOutcome::Declined);
        assert_eq!(f.api.calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.local.keys().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn clear_all_remote_failure_leaves_local_intact() {
        let f = fixture(true, false);
        seed(&f);
        let settings_before = f.local.get(SETTINGS_KEY).unwrap();

        let result = f.controller.clear_all_data().await;
        assert_matches!(
            result,
            Err(SettingsError::RemoteOperationFailed(CoreError::Network(_)))
        );
        assert_eq!(f.local.get(SETTINGS_KEY).unwrap(), settings_before);
        assert_eq!(f.local.keys().unwrap().len(), 2);
        assert_eq!(f.session.keys().unwrap(), vec!["uploadDraft".to_string()]);
        assert!(!f.page.scheduled.load(Ordering::SeqCst));
        assert_eq!(f.prompt.toasts(), vec![CLEAR_FAILED_TOAST.to_string()]);
    }

    #[tokio::test]
    async fn clear_all_success_wipes_local_and_reloads() {
        let f = fixture(true, true);
        seed(&f);
        f.controller.initialize();
        assert_eq!(f.doc.current_theme(), Some(ThemeMode::Dark));

        let outcome = f.controller.clear_all_data().await.unwrap();
        assert_eq!(outcome, ActionOutcome::Completed);
        assert_eq!(f.api.calls.load(Ordering::SeqCst), 1);
        assert!(f.local.keys().unwrap().is_empty());
        assert!(f.session.keys().unwrap().is_empty());
        assert_eq!(f.doc.current_theme(), Some(ThemeMode::Light));
        assert_eq!(*f.page.reload.lock().unwrap(), Some(Duration::from_secs(2)));
        assert_eq!(f.prompt.toasts(), vec![CLEARED_TOAST.to_string()]);
    }

    /// 저장소 읽기와 테마 적용을 한 줄로 기록
    type CallLog = Arc<Mutex<Vec<String>>>;

    struct LoggingStorage {
        inner: TabStorage,
        log: CallLog,
    }

    impl KeyValueStore for LoggingStorage {
        fn origin(&self) -> Uuid {
            self.inner.origin()
        }
        fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
            self.log.lock().unwrap().push(format!("get {key}"));
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
            self.inner.set(key, value)
        }
        fn remove(&self, key: &str) -> Result<(), CoreError> {
            self.inner.remove(key)
        }
        fn clear(&self) -> Result<(), CoreError> {
            self.inner.clear()
        }
        fn keys(&self) -> Result<Vec<String>, CoreError> {
            self.inner.keys()
        }
        fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
            self.inner.subscribe()
        }
    }

    struct LoggingTarget {
        current: Mutex<Option<ThemeMode>>,
        log: CallLog,
    }

    impl ThemeTarget for LoggingTarget {
        fn set_theme(&self, mode: ThemeMode) {
            self.log.lock().unwrap().push(format!("theme {mode}"));
            *self.current.lock().unwrap() = Some(mode);
        }
        fn current_theme(&self) -> Option<ThemeMode> {
            *self.current.lock().unwrap()
        }
    }

    #[test]
    fn initialize_runs_raw_pass_before_merged_pass() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let inner = StorageArea::in_memory().tab();
        // 알려지지 않은 모델과 잘못된 기준값: 조기 적용은 theme만 본다
        inner
            .set(
                SETTINGS_KEY,
                r#"{"theme":"auto","confidenceThreshold":"high","defaultModel":"Grape"}"#,
            )
            .unwrap();
        let storage: Arc<dyn KeyValueStore> = Arc::new(LoggingStorage {
            inner,
            log: log.clone(),
        });
        let target = Arc::new(LoggingTarget {
            current: Mutex::new(None),
            log: log.clone(),
        });
        let applier = Arc::new(ThemeApplier::new(
            target.clone(),
            Arc::new(AmbientSignal::new(ThemeMode::Dark)),
        ));
        let store = Arc::new(SettingsStore::new(storage, applier, SettingsBus::default()));
        let controller = SettingsController::new(
            store,
            ScriptedPrompt::answering(true),
            FakeDataApi::new(true),
            Arc::new(RecordingPage::default()),
        );

        let settings = controller.initialize();
        assert_eq!(settings.confidence_threshold, 50);
        assert_eq!(settings.default_model, "Grape");
        assert_eq!(
            log.lock().unwrap().as_slice(),
            &[
                "get appSettings".to_string(),
                "theme dark".to_string(),
                "get appSettings".to_string(),
                "theme dark".to_string(),
            ]
        );
        assert_eq!(target.current_theme(), Some(ThemeMode::Dark));
    }

    #[tokio::test]
    async fn model_info_refresh() {
        let f = fixture(true, true);
        let catalog = f.controller.refresh_model_info().await.unwrap();
        assert_eq!(catalog["FAVDD"].version, "2.1");

        let failing = fixture(true, false);
        assert!(failing.controller.refresh_model_info().await.is_none());
        assert!(failing.prompt.toasts().is_empty());
    }
}
