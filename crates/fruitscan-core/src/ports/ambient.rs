//! 주변 색상 선호 신호 포트.
//!
//! 호스트 환경(OS/브라우저)의 다크 모드 선호를 조회하고 변경을 구독한다.

use tokio::sync::watch;

use crate::models::theme::ThemeMode;

/// 주변 색상 선호
pub trait AmbientPreference: Send + Sync {
    /// 현재 선호 (호출 시점에 평가, 캐시하지 않음)
    fn current(&self) -> ThemeMode;

    /// 변경 구독
    fn watch(&self) -> watch::Receiver<ThemeMode>;
}
