//! 문서 테마 속성.
//!
//! `ThemeTarget` 구현. 현재 `data-theme` 값을 보관하고 관찰자에게 알린다.

use fruitscan_core::models::theme::ThemeMode;
use fruitscan_core::ports::theme_target::ThemeTarget;
use tokio::sync::watch;

/// 문서 전체 테마 속성
#[derive(Debug)]
pub struct DocumentTheme {
    tx: watch::Sender<Option<ThemeMode>>,
}

impl DocumentTheme {
    /// 속성이 비어 있는 문서
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// 속성 변경 관찰
    pub fn subscribe(&self) -> watch::Receiver<Option<ThemeMode>> {
        self.tx.subscribe()
    }
}

impl Default for DocumentTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeTarget for DocumentTheme {
    fn set_theme(&self, mode: ThemeMode) {
        self.tx.send_if_modified(|current| {
            if *current == Some(mode) {
                false
            } else {
                *current = Some(mode);
                true
            }
        });
    }

    fn current_theme(&self) -> Option<ThemeMode> {
        *self.tx.borrow()
    }
}
