//! 설정 이벤트 버스.
//!
//! `tokio::broadcast` 기반. 같은 탭의 저장과 다른 탭의 저장소 변경,
//! 주변 색상 변경이 모두 이 채널 하나로 들어온다.

use fruitscan_core::models::settings::Settings;
use fruitscan_core::models::theme::ThemeMode;
use tokio::sync::broadcast;
use tracing::debug;

/// 설정 이벤트
#[derive(Debug, Clone)]
pub enum SettingsEvent {
    /// 이 탭에서 저장
    Saved(Settings),
    /// 파일에서 가져오기
    Imported(Settings),
    /// 기본값으로 초기화
    Reset,
    /// 로컬 데이터 전체 삭제
    Cleared,
    /// 다른 탭에서 설정 슬롯 변경
    StorageChanged { new_value: Option<String> },
    /// 주변 색상 선호 변경
    AmbientChanged(ThemeMode),
}

/// 설정 이벤트 버스
#[derive(Debug, Clone)]
pub struct SettingsBus {
    tx: broadcast::Sender<SettingsEvent>,
}

impl SettingsBus {
    /// 새 이벤트 버스 생성
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// 이벤트 발행
    pub fn publish(&self, event: SettingsEvent) {
        debug!("설정 이벤트 발행: {:?}", std::mem::discriminant(&event));
        let _ = self.tx.send(event);
    }

    /// 구독자 생성
    pub fn subscribe(&self) -> broadcast::Receiver<SettingsEvent> {
        self.tx.subscribe()
    }
}

impl Default for SettingsBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = SettingsBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(SettingsEvent::AmbientChanged(ThemeMode::Dark));

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, SettingsEvent::AmbientChanged(ThemeMode::Dark)));
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let bus = SettingsBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(SettingsEvent::Reset);

        assert!(matches!(rx1.recv().await.unwrap(), SettingsEvent::Reset));
        assert!(matches!(rx2.recv().await.unwrap(), SettingsEvent::Reset));
    }

    #[test]
    fn publish_without_subscribers_is_noop() {
        let bus = SettingsBus::default();
        bus.publish(SettingsEvent::Cleared);
    }
}
