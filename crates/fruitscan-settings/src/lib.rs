//! # fruitscan-settings
//!
//! 클라이언트 설정 서브시스템.
//!
//! - [`store`]: 설정 슬롯 로드/병합/저장/초기화/가져오기/내보내기
//! - [`theme`]: 저장된 테마 선호 + 주변 색상 신호 → 문서 테마 적용
//! - [`bus`]: 같은 탭/다른 탭 변경을 하나로 모으는 내부 이벤트 채널
//! - [`controller`]: 설정 페이지 동작 (확인 절차, 토스트, 전체 데이터 삭제)
//! - [`ambient`], [`document`]: 주변 신호/문서 테마 속성의 기본 구현

pub mod ambient;
pub mod bus;
pub mod controller;
pub mod document;
pub mod error;
pub mod store;
pub mod theme;

pub use bus::{SettingsBus, SettingsEvent};
pub use controller::{ActionOutcome, SettingsController};
pub use error::SettingsError;
pub use store::{ExportedSettings, LoadOutcome, SettingsStore, SETTINGS_KEY};
pub use theme::{ThemeApplier, ThemeSubscription};
