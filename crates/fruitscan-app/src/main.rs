//! # fruitscan-app
//!
//! Fruit Scanner 설정 CLI 진입점.
//! 설정 로드, tracing 초기화, 어댑터 와이어링, 하위 명령 실행.

mod config_loader;
mod page;
mod terminal;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fruitscan_core::models::settings::KNOWN_MODELS;
use fruitscan_core::models::theme::ThemeMode;
use fruitscan_core::ports::theme_target::ThemeTarget;
use fruitscan_settings::ActionOutcome;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::page::Page;
use crate::terminal::{ConsolePrompt, ReloadNotice};

/// Fruit Scanner 클라이언트 설정 도구
///
/// 저장된 사용자 설정과 화면 테마를 관리한다.
#[derive(Parser, Debug)]
#[command(name = "fruitscan")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "warn", global = true)]
    log_level: String,

    /// 서버 URL (기본: http://localhost:5000)
    #[arg(long, short = 's', global = true)]
    server: Option<String>,

    /// 설정 저장소 파일 경로 (기본: 플랫폼 데이터 디렉토리)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    /// 주변 색상 선호 (light, dark): `auto` 테마 해석에 사용
    #[arg(long, global = true)]
    ambient: Option<ThemeMode>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 병합된 설정과 적용 테마 출력
    Show,
    /// 설정 필드 하나 변경 (예: `set theme dark`)
    Set { field: String, value: String },
    /// 적용 테마 출력
    Theme,
    /// 설정을 기본값으로 초기화
    Reset {
        /// 확인 없이 진행
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// 설정을 JSON 파일로 내보내기
    Export {
        /// 저장 디렉토리
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// JSON 파일에서 설정 가져오기
    Import { file: PathBuf },
    /// 분류 모델 정보 출력
    Models,
    /// 서버와 로컬의 모든 데이터 삭제
    ClearAll {
        /// 확인 없이 진행
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

impl Command {
    fn assume_yes(&self) -> bool {
        match self {
            Self::Reset { yes } | Self::ClearAll { yes } => *yes,
            _ => false,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "fruitscan={},fruitscan_core={},fruitscan_settings={},fruitscan_storage={},fruitscan_network={}",
        args.log_level, args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // 설정 로드 후 CLI 인자로 오버라이드
    let config_file = config_loader::default_config_file();
    let mut config = config_loader::load_config(config_file.as_deref())?;
    if let Some(ref server_url) = args.server {
        config.server.base_url = server_url.clone();
    }
    if let Some(ref path) = args.storage {
        config.storage.path = Some(path.clone());
    }
    if let Some(ambient) = args.ambient {
        config.ui.ambient = ambient;
    }
    info!("서버: {}", config.server.base_url);

    let storage_path = config_loader::resolve_storage_path(&config);
    let page = Page::open(
        &config,
        &storage_path,
        Arc::new(ConsolePrompt::new(args.command.assume_yes())),
        Arc::new(ReloadNotice),
    )?;

    run(&page, args.command).await
}

async fn run(page: &Page, command: Command) -> Result<()> {
    let controller = &page.controller;
    let settings = controller.initialize();

    match command {
        Command::Show => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            print_theme(page);
        }
        Command::Set { field, value } => {
            let mut settings = settings;
            settings.set_field(&field, &value)?;
            if field == "defaultModel" && !settings.has_known_model() {
                warn!("알 수 없는 모델: {}", settings.default_model);
            }

            if field == "language" {
                controller.change_language(&settings).await;
            } else {
                controller.save_settings(&settings).await?;
            }
            print_theme(page);
        }
        Command::Theme => print_theme(page),
        Command::Reset { .. } => {
            if controller.reset_settings().await? == ActionOutcome::Declined {
                println!("취소됨");
            }
            print_theme(page);
        }
        Command::Export { dir } => {
            let exported = controller.export_settings().await?;
            let path = dir.join(&exported.file_name);
            std::fs::write(&path, exported.contents)
                .with_context(|| format!("파일 쓰기 실패: {}", path.display()))?;
            println!("{}", path.display());
        }
        Command::Import { file } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("파일 읽기 실패: {}", file.display()))?;
            controller.import_settings(&contents).await?;
            print_theme(page);
        }
        Command::Models => {
            let catalog = controller.refresh_model_info().await.unwrap_or_default();
            for name in KNOWN_MODELS {
                let marker = if *name == settings.default_model { "*" } else { " " };
                match catalog.get(*name) {
                    Some(info) => println!(
                        "{marker} {name:<8} v{}  {}%  {}",
                        info.version, info.accuracy, info.last_updated
                    ),
                    None => println!("{marker} {name:<8} -"),
                }
            }
        }
        Command::ClearAll { .. } => {
            if controller.clear_all_data().await? == ActionOutcome::Declined {
                println!("취소됨");
            }
        }
    }

    Ok(())
}

fn print_theme(page: &Page) {
    match page.document.current_theme() {
        Some(mode) => println!("theme: {mode}"),
        None => println!("theme: (not applied)"),
    }
}
