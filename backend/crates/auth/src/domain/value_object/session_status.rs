//! Session Status Value Object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of one session row
///
/// ```text
/// ACTIVE ──logout──▶ LOGOUT
///   │
///   ├──refresh──▶ REFRESHED   (successor row created, same family)
///   │
///   └──family invalidated──▶ COMPROMISED
/// ```
/// Every state except `Active` is terminal for the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Active,
    Logout,
    Refreshed,
    Compromised,
}

impl SessionStatus {
    /// String code for storage/API
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Logout => "LOGOUT",
            Self::Refreshed => "REFRESHED",
            Self::Compromised => "COMPROMISED",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ACTIVE" => Some(Self::Active),
            "LOGOUT" => Some(Self::Logout),
            "REFRESHED" => Some(Self::Refreshed),
            "COMPROMISED" => Some(Self::Compromised),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for status in [
            SessionStatus::Active,
            SessionStatus::Logout,
            SessionStatus::Refreshed,
            SessionStatus::Compromised,
        ] {
            assert_eq!(SessionStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(SessionStatus::from_code("active"), None);
    }

    #[test]
    fn test_only_active_is_live() {
        assert!(!SessionStatus::Active.is_terminal());
        assert!(SessionStatus::Logout.is_terminal());
        assert!(SessionStatus::Refreshed.is_terminal());
        assert!(SessionStatus::Compromised.is_terminal());
    }

    #[test]
    fn test_serde_matches_code() {
        let json = serde_json::to_string(&SessionStatus::Refreshed).unwrap();
        assert_eq!(json, "\"REFRESHED\"");
    }
}
