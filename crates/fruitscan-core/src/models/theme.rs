//! 테마 모델.
//!
//! 저장된 테마 선호(`light`/`dark`/`auto`)와 실제 적용되는 테마 모드(`light`/`dark`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// 저장되는 테마 선호
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    /// 항상 라이트
    #[default]
    Light,
    /// 항상 다크
    Dark,
    /// 주변(OS/브라우저) 색상 선호를 따름
    Auto,
}

impl ThemePreference {
    /// 직렬화 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "auto" => Ok(Self::Auto),
            other => Err(CoreError::Validation {
                field: "theme".to_string(),
                message: format!("알 수 없는 값: {other}"),
            }),
        }
    }
}

/// 테마 모드 (문서에 실제 적용되는 값)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// 다크 테마
    Dark,
    /// 라이트 테마
    Light,
}

impl ThemeMode {
    /// 선호와 주변 신호로 실제 모드를 결정한다.
    ///
    /// `auto`만 주변 신호를 본다. 모든 입력 조합은 정확히 하나의 모드로 매핑된다.
    pub fn resolve(preference: ThemePreference, ambient: ThemeMode) -> Self {
        match preference {
            ThemePreference::Dark => Self::Dark,
            ThemePreference::Light => Self::Light,
            ThemePreference::Auto => ambient,
        }
    }

    /// 문서 `data-theme` 속성 값
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(CoreError::Validation {
                field: "ambient".to_string(),
                message: format!("알 수 없는 값: {other}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_follows_ambient() {
        assert_eq!(
            ThemeMode::resolve(ThemePreference::Auto, ThemeMode::Dark),
            ThemeMode::Dark
        );
        assert_eq!(
            ThemeMode::resolve(ThemePreference::Auto, ThemeMode::Light),
            ThemeMode::Light
        );
    }

    #[test]
    fn explicit_preference_ignores_ambient() {
        for ambient in [ThemeMode::Light, ThemeMode::Dark] {
            assert_eq!(
                ThemeMode::resolve(ThemePreference::Dark, ambient),
                ThemeMode::Dark
            );
            assert_eq!(
                ThemeMode::resolve(ThemePreference::Light, ambient),
                ThemeMode::Light
            );
        }
    }

    #[test]
    fn preference_parse() {
        assert_eq!("auto".parse::<ThemePreference>().unwrap(), ThemePreference::Auto);
        assert!("Dark".parse::<ThemePreference>().is_err());
        assert_eq!(ThemePreference::default(), ThemePreference::Light);
    }
}
