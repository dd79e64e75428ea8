//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 각 어댑터 crate가 이 trait들을 구현하며,
//! `fruitscan-app`에서 `Arc<dyn T>`로 와이어링한다.
//!
//! 원격 호출과 사용자 상호작용은 `async_trait` 매크로를 사용하여
//! object safety를 보장한다. 저장소와 테마 대상은 동기 호출이다.

pub mod ambient;
pub mod data_api;
pub mod prompt;
pub mod storage;
pub mod theme_target;
