//! # fruitscan-core
//!
//! Fruit Scanner 클라이언트 설정 서브시스템의 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 설정/테마/모델 정보 데이터 구조체 (serde)
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스 (저장소, 주변 색상 신호, 문서 테마, 원격 API)
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체

pub mod config;
pub mod error;
pub mod models;
pub mod ports;
