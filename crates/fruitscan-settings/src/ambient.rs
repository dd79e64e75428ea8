//! 주변 색상 선호 신호.
//!
//! `watch` 채널 기반 `AmbientPreference` 구현. 호스트가 OS 설정 변경을
//! 감지하면 `set`으로 밀어 넣는다.

use fruitscan_core::models::theme::ThemeMode;
use fruitscan_core::ports::ambient::AmbientPreference;
use tokio::sync::watch;
use tracing::debug;

/// 주변 색상 선호 신호
#[derive(Debug)]
pub struct AmbientSignal {
    tx: watch::Sender<ThemeMode>,
}

impl AmbientSignal {
    /// 초기값으로 생성
    pub fn new(initial: ThemeMode) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// 선호 변경 (같은 값이면 알리지 않음)
    pub fn set(&self, mode: ThemeMode) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == mode {
                false
            } else {
                *current = mode;
                true
            }
        });
        if changed {
            debug!("주변 색상 선호 변경: {mode}");
        }
    }
}

impl AmbientPreference for AmbientSignal {
    fn current(&self) -> ThemeMode {
        *self.tx.borrow()
    }

    fn watch(&self) -> watch::Receiver<ThemeMode> {
        self.tx.subscribe()
    }
}
