//! 설정 저장소.
//!
//! 로컬 저장소의 설정 슬롯 하나에 JSON으로 설정을 보관한다.
//! 읽기는 절대 실패하지 않는다: 슬롯이 없거나 손상되었으면 기본값을 쓴다.

use chrono::{NaiveDate, Utc};
use fruitscan_core::error::CoreError;
use fruitscan_core::models::settings::Settings;
use fruitscan_core::ports::storage::KeyValueStore;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::bus::{SettingsBus, SettingsEvent};
use crate::error::SettingsError;
use crate::theme::ThemeApplier;

/// 설정 슬롯 키
pub const SETTINGS_KEY: &str = "appSettings";

/// 내보내기 파일 이름 접두사
const EXPORT_FILE_PREFIX: &str = "fruit-scanner-settings";

/// 기본값을 쓰게 된 이유
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultReason {
    /// 저장된 값 없음
    Absent,
    /// 저장소 읽기 실패
    Unreadable(String),
    /// JSON 파싱 실패
    Corrupt(String),
    /// JSON이지만 객체가 아님
    NotAnObject,
}

/// 설정 로드 결과
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// 저장된 객체를 기본값에 병합
    Stored(Settings),
    /// 기본값 사용
    Defaulted(DefaultReason),
}

impl LoadOutcome {
    /// 사용할 설정 (항상 유효)
    pub fn into_settings(self) -> Settings {
        match self {
            Self::Stored(settings) => settings,
            Self::Defaulted(_) => Settings::default(),
        }
    }

    /// 기본값으로 대체되었는지
    pub fn is_defaulted(&self) -> bool {
        matches!(self, Self::Defaulted(_))
    }
}

/// 내보낸 설정 파일
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedSettings {
    /// 다운로드 파일 이름 (`fruit-scanner-settings-YYYY-MM-DD.json`)
    pub file_name: String,
    /// 들여쓰기된 JSON
    pub contents: String,
}

/// 설정 저장소
pub struct SettingsStore {
    storage: Arc<dyn KeyValueStore>,
    applier: Arc<ThemeApplier>,
    bus: SettingsBus,
}

impl SettingsStore {
    /// 새 설정 저장소 생성
    pub fn new(storage: Arc<dyn KeyValueStore>, applier: Arc<ThemeApplier>, bus: SettingsBus) -> Self {
        Self {
            storage,
            applier,
            bus,
        }
    }

    /// 설정 슬롯이 있는 저장소
    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }

    /// 테마 적용기
    pub fn applier(&self) -> &Arc<ThemeApplier> {
        &self.applier
    }

    /// 이벤트 버스
    pub fn bus(&self) -> &SettingsBus {
        &self.bus
    }

    /// 슬롯을 읽고 기본값에 병합한 결과
    pub fn load_outcome(&self) -> LoadOutcome {
        let raw = match self.storage.get(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return LoadOutcome::Defaulted(DefaultReason::Absent),
            Err(e) => return LoadOutcome::Defaulted(DefaultReason::Unreadable(e.to_string())),
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(stored)) => LoadOutcome::Stored(Settings::merge_stored(&stored)),
            Ok(_) => LoadOutcome::Defaulted(DefaultReason::NotAnObject),
            Err(e) => LoadOutcome::Defaulted(DefaultReason::Corrupt(e.to_string())),
        }
    }

    /// 현재 설정 (항상 9개 필드 모두 포함)
    pub fn load(&self) -> Settings {
        let outcome = self.load_outcome();
        if let LoadOutcome::Defaulted(reason) = &outcome {
            match reason {
                DefaultReason::Absent => debug!("저장된 설정 없음, 기본값 사용"),
                other => warn!("저장된 설정 사용 불가, 기본값 사용: {other:?}"),
            }
        }
        outcome.into_settings()
    }

    /// 설정 전체 저장
    ///
    /// 호출자는 9개 필드를 모두 채운 설정을 넘긴다. 저장 직후 테마를 다시 적용하고
    /// 같은 탭 구독자에게 변경을 알린다. 저장소 쓰기가 실패해도 적용과 알림은
    /// 진행하고 에러를 반환한다.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let serialized = serde_json::to_string(settings).map_err(CoreError::from)?;
        let written = self.storage.set(SETTINGS_KEY, &serialized);
        if let Err(e) = &written {
            warn!("설정 저장 실패: {e}");
        } else {
            debug!("설정 저장 완료");
        }

        self.applier.apply(settings.theme);
        self.bus.publish(SettingsEvent::Saved(settings.clone()));

        written.map_err(SettingsError::from)
    }

    /// 현재 설정을 수정해 전체 저장
    pub fn update_with<F>(&self, updater: F) -> Result<Settings, SettingsError>
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.load();
        updater(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }

    /// 설정 슬롯 삭제 (다음 로드부터 모든 필드가 기본값)
    ///
    /// 사용자 확인은 호출자가 먼저 받는다.
    pub fn reset(&self) -> Result<Settings, SettingsError> {
        self.storage.remove(SETTINGS_KEY)?;
        info!("설정 초기화");

        let settings = self.load();
        self.applier.apply(settings.theme);
        self.bus.publish(SettingsEvent::Reset);
        Ok(settings)
    }

    /// 오늘(UTC) 날짜로 내보내기
    pub fn export(&self) -> Result<ExportedSettings, SettingsError> {
        self.export_at(Utc::now().date_naive())
    }

    /// 지정 날짜로 내보내기 (병합된 현재 설정)
    pub fn export_at(&self, date: NaiveDate) -> Result<ExportedSettings, SettingsError> {
        let settings = self.load();
        let contents = serde_json::to_string_pretty(&settings)
            .map_err(CoreError::from)?;

        Ok(ExportedSettings {
            file_name: format!("{EXPORT_FILE_PREFIX}-{}.json", date.format("%Y-%m-%d")),
            contents,
        })
    }

    /// 파일 내용에서 가져오기
    ///
    /// 객체 JSON이면 슬롯을 통째로 덮어쓴다 (기존 값과 병합하지 않음).
    /// 형식이 잘못되면 저장된 설정은 그대로 둔다.
    pub fn import(&self, contents: &str) -> Result<Settings, SettingsError> {
        let imported = match serde_json::from_str::<Value>(contents) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(SettingsError::InvalidImportFormat(
                    "설정 객체가 아님".to_string(),
                ))
            }
            Err(e) => return Err(SettingsError::InvalidImportFormat(e.to_string())),
        };

        let serialized = serde_json::to_string(&imported)
            .map_err(CoreError::from)?;
        self.storage.set(SETTINGS_KEY, &serialized)?;
        info!("설정 가져오기 완료: {}개 필드", imported.len());

        let settings = self.load();
        self.applier.apply(settings.theme);
        self.bus.publish(SettingsEvent::Imported(settings.clone()));
        Ok(settings)
    }

    /// 로컬 저장소 전체 삭제 (설정 슬롯만이 아님)
    pub fn clear_local(&self) -> Result<(), SettingsError> {
        self.storage.clear()?;
        info!("로컬 저장소 전체 삭제");

        self.applier.apply_early(self.storage.as_ref());
        self.bus.publish(SettingsEvent::Cleared);
        Ok(())
    }
}
