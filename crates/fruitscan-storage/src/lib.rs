//! # fruitscan-storage
//!
//! 로컬 저장소 어댑터.
//! 같은 출처(origin)의 모든 탭이 공유하는 저장 영역과,
//! 탭별 핸들(`KeyValueStore` 구현)을 제공한다.
//!
//! ## 모듈
//! - `area`: 저장 영역 + 탭 핸들 + 변경 알림 브로드캐스트
//! - `sqlite`: 파일 기반 영구 백엔드
//! - `migration`: 스키마 마이그레이션

pub mod area;
pub mod migration;
mod sqlite;

pub use area::{StorageArea, TabStorage};
