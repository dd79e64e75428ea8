//! # fruitscan-network
//!
//! 네트워크 어댑터.
//! 백엔드 서버의 데이터 관리 API(`DataApi` 포트)를 reqwest로 구현한다.

pub mod http_client;

pub use http_client::HttpDataClient;
