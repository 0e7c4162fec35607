//! Email Value Object
//!
//! A syntactically plausible email address. Ownership is proven separately
//! through the verification-code flow.
//!
//! Emails are compared exactly as stored (case-sensitive); only surrounding
//! whitespace is trimmed.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{AuthError, AuthResult};

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

/// Email address value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Create a new email with validation
    pub fn new(email: impl Into<String>) -> AuthResult<Self> {
        let email = email.into().trim().to_string();

        if email.is_empty() {
            return Err(AuthError::InvalidEmail("email cannot be empty".into()));
        }

        if email.len() > EMAIL_MAX_LENGTH {
            return Err(AuthError::InvalidEmail(format!(
                "email must be at most {} characters",
                EMAIL_MAX_LENGTH
            )));
        }

        if !Self::is_valid_format(&email) {
            return Err(AuthError::InvalidEmail("invalid email format".into()));
        }

        Ok(Self(email))
    }

    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        if local.is_empty() || local.len() > 64 || domain.contains('@') {
            return false;
        }

        if domain.is_empty() || !domain.contains('.') {
            return false;
        }

        if !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return false;
        }

        !(domain.starts_with(['.', '-']) || domain.ends_with(['.', '-']))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn domain(&self) -> &str {
        self.0.split('@').nth(1).unwrap_or("")
    }
}

impl FromStr for Email {
    type Err = AuthError;

    fn from_str(s: &str) -> AuthResult<Self> {
        Email::new(s)
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        assert!(Email::new("a@x.com").is_ok());
        assert!(Email::new("user.name@example.co.jp").is_ok());
        assert!(Email::new("user+tag@example.com").is_ok());
    }

    #[test]
    fn test_email_invalid() {
        for bad in [
            "",
            "userexample.com",
            "user@",
            "@example.com",
            "user@@example.com",
            "user@example",
            "user@.example.com",
            "user@example.com-",
        ] {
            assert!(
                matches!(Email::new(bad), Err(AuthError::InvalidEmail(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_email_is_case_sensitive_as_stored() {
        let email = Email::new("  User@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "User@Example.COM");
        assert_ne!(email, Email::new("user@example.com").unwrap());
    }

    #[test]
    fn test_email_domain() {
        let email = Email::new("user@example.com").unwrap();
        assert_eq!(email.domain(), "example.com");
    }
}
