//! 문서 테마 속성 포트.

use crate::models::theme::ThemeMode;

/// 문서 전체 테마 속성 (`data-theme`)
pub trait ThemeTarget: Send + Sync {
    /// 테마 속성 설정
    fn set_theme(&self, mode: ThemeMode);

    /// 현재 속성 값 (아직 적용 전이면 None)
    fn current_theme(&self) -> Option<ThemeMode>;
}
