//! 테마 적용기.
//!
//! 테마 선호와 주변 색상 신호로 실제 모드를 결정해 문서에 적용한다.
//! 페이지 수명 동안 다른 탭의 설정 슬롯 변경과 주변 색상 변경을 구독하여
//! 매번 다시 적용한다 (멱등, 디바운스 없음).

use fruitscan_core::error::CoreError;
use fruitscan_core::models::theme::{ThemeMode, ThemePreference};
use fruitscan_core::ports::ambient::AmbientPreference;
use fruitscan_core::ports::storage::KeyValueStore;
use fruitscan_core::ports::theme_target::ThemeTarget;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::bus::{SettingsBus, SettingsEvent};
use crate::store::SETTINGS_KEY;

/// 테마 적용기
pub struct ThemeApplier {
    target: Arc<dyn ThemeTarget>,
    ambient: Arc<dyn AmbientPreference>,
}

impl ThemeApplier {
    /// 새 적용기 생성
    pub fn new(target: Arc<dyn ThemeTarget>, ambient: Arc<dyn AmbientPreference>) -> Self {
        Self { target, ambient }
    }

    /// 선호를 해석해 문서에 적용하고 적용된 모드를 반환
    ///
    /// `auto`는 호출 시점의 주변 신호로 해석한다.
    pub fn apply(&self, preference: ThemePreference) -> ThemeMode {
        let mode = ThemeMode::resolve(preference, self.ambient.current());
        self.target.set_theme(mode);
        debug!("테마 적용: {preference} → {mode}");
        mode
    }

    /// 화면 깜빡임 방지용 조기 적용
    ///
    /// 기본값 병합 없이 슬롯의 `theme` 값만 직접 읽는다. 어떤 에러든 라이트로 처리.
    pub fn apply_early(&self, storage: &dyn KeyValueStore) -> ThemeMode {
        match storage.get(SETTINGS_KEY) {
            Ok(raw) => self.apply_raw(raw.as_deref()),
            Err(e) => {
                warn!("저장된 테마 읽기 실패, 라이트 테마 사용: {e}");
                self.apply(ThemePreference::Light)
            }
        }
    }

    /// 슬롯의 원시 값으로 적용 (`None`은 슬롯 없음)
    pub fn apply_raw(&self, raw: Option<&str>) -> ThemeMode {
        let preference = raw_theme_preference(raw).unwrap_or_else(|e| {
            warn!("저장된 테마 해석 실패, 라이트 테마 사용: {e}");
            ThemePreference::Light
        });
        self.apply(preference)
    }

    /// 문서에 현재 적용된 모드
    pub fn current(&self) -> Option<ThemeMode> {
        self.target.current_theme()
    }

    /// 설정 이벤트 처리
    pub fn handle(&self, event: &SettingsEvent, storage: &dyn KeyValueStore) -> ThemeMode {
        match event {
            SettingsEvent::Saved(settings) | SettingsEvent::Imported(settings) => {
                self.apply(settings.theme)
            }
            SettingsEvent::Reset => self.apply(ThemePreference::default()),
            SettingsEvent::StorageChanged { new_value } => self.apply_raw(new_value.as_deref()),
            SettingsEvent::Cleared | SettingsEvent::AmbientChanged(_) => {
                self.apply_early(storage)
            }
        }
    }

    /// 페이지 수명 동안 변경 신호 구독 시작
    ///
    /// 다른 탭의 슬롯 변경과 주변 색상 변경을 버스로 전달하고, 버스의 모든
    /// 이벤트에 대해 다시 적용한다. 구독은 반환 전에 모두 등록된다.
    pub fn listen(
        self: &Arc<Self>,
        storage: Arc<dyn KeyValueStore>,
        bus: &SettingsBus,
    ) -> ThemeSubscription {
        let mut events = bus.subscribe();
        let storage_forwarder = forward_storage_changes(Arc::clone(&storage), bus.clone());
        let ambient_forwarder = forward_ambient_changes(self.ambient.as_ref(), bus.clone());

        let applier = Arc::clone(self);
        let reapplier = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        applier.handle(&event, storage.as_ref());
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("설정 이벤트 {skipped}개 누락, 저장소 기준으로 다시 적용");
                        applier.apply_early(storage.as_ref());
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        ThemeSubscription {
            handles: vec![storage_forwarder, ambient_forwarder, reapplier],
        }
    }
}

/// 구독 핸들: 드롭하면 모든 구독 태스크 중단
pub struct ThemeSubscription {
    handles: Vec<JoinHandle<()>>,
}

impl ThemeSubscription {
    /// 구독 중단
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for ThemeSubscription {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

/// 슬롯 원시 값의 `theme` 필드 (없으면 라이트)
fn raw_theme_preference(raw: Option<&str>) -> Result<ThemePreference, CoreError> {
    let Some(raw) = raw else {
        return Ok(ThemePreference::Light);
    };

    let value: Value = serde_json::from_str(raw)?;
    match value.get("theme") {
        None | Some(Value::Null) => Ok(ThemePreference::Light),
        Some(Value::String(theme)) => theme.parse(),
        Some(other) => Err(CoreError::Validation {
            field: "theme".to_string(),
            message: format!("문자열이 아님: {other}"),
        }),
    }
}

/// 다른 탭에서 온 설정 슬롯 변경을 버스로 전달
///
/// 알림을 놓친 경우 슬롯을 다시 읽어 현재 값으로 전달한다.
fn forward_storage_changes(storage: Arc<dyn KeyValueStore>, bus: SettingsBus) -> JoinHandle<()> {
    let origin = storage.origin();
    let mut changes = storage.subscribe();

    tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(change) if change.origin != origin && change.is_for(SETTINGS_KEY) => {
                    debug!("다른 탭의 설정 변경 수신");
                    bus.publish(SettingsEvent::StorageChanged {
                        new_value: change.new_value,
                    });
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!("저장소 변경 알림 {skipped}개 누락, 슬롯 다시 읽기");
                    match storage.get(SETTINGS_KEY) {
                        Ok(new_value) => bus.publish(SettingsEvent::StorageChanged { new_value }),
                        Err(e) => warn!("설정 슬롯 읽기 실패: {e}"),
                    }
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// 주변 색상 변경을 버스로 전달
fn forward_ambient_changes(ambient: &dyn AmbientPreference, bus: SettingsBus) -> JoinHandle<()> {
    // 새 수신자는 현재 값을 이미 본 것으로 표시됨
    let mut watcher = ambient.watch();

    tokio::spawn(async move {
        while watcher.changed().await.is_ok() {
            let mode = *watcher.borrow_and_update();
            bus.publish(SettingsEvent::AmbientChanged(mode));
        }
    })
}
