//! 도메인 모델.

pub mod model;
pub mod settings;
pub mod theme;
