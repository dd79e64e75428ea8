//! 터미널 어댑터.
//!
//! 확인 요청은 표준 입력으로 받고, 토스트와 리로드 안내는 표준 출력에 쓴다.

use async_trait::async_trait;
use fruitscan_core::ports::prompt::{PageControl, UserPrompt};
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing::{info, warn};

/// 터미널 확인/알림
pub struct ConsolePrompt {
    /// `--yes`: 확인 요청을 자동 수락
    assume_yes: bool,
}

impl ConsolePrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait]
impl UserPrompt for ConsolePrompt {
    async fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            info!("확인 자동 수락 (--yes)");
            return true;
        }

        let message = message.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            print!("{message} [y/N] ");
            io::stdout().flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            Ok::<_, io::Error>(line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => is_affirmative(&line),
            Ok(Err(e)) => {
                warn!("확인 입력 읽기 실패: {e}");
                false
            }
            Err(e) => {
                warn!("확인 입력 태스크 실패: {e}");
                false
            }
        }
    }

    async fn show_toast(&self, message: &str) {
        println!("💬 {message}");
    }
}

/// 리로드 안내
///
/// CLI는 호출마다 새로 시작하므로 다음 실행이 곧 리로드다.
pub struct ReloadNotice;

impl PageControl for ReloadNotice {
    fn schedule_reload(&self, delay: Duration) {
        info!("리로드 예약: {}ms", delay.as_millis());
        println!("🔄 다음 실행부터 초기 상태로 시작합니다.");
    }
}

fn is_affirmative(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
