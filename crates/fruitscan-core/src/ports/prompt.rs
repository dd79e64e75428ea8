//! 사용자 상호작용 포트.
//!
//! 파괴적 작업 확인, 일시적 안내 메시지(토스트), 페이지 리로드.

use async_trait::async_trait;
use std::time::Duration;

/// 사용자 확인/알림 인터페이스
#[async_trait]
pub trait UserPrompt: Send + Sync {
    /// 확인 요청: 사용자가 수락하면 true
    async fn confirm(&self, message: &str) -> bool;

    /// 일시적 안내 메시지 표시 (일정 시간 후 자동으로 사라짐)
    async fn show_toast(&self, message: &str);
}

/// 페이지 제어
pub trait PageControl: Send + Sync {
    /// 지정 시간 후 전체 리로드 예약
    fn schedule_reload(&self, delay: Duration);
}
