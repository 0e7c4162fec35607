//! User Account Entity
//!
//! Created once at registration, mutated only by email verification.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{email::Email, user_id::UserId, user_password::UserPassword};
use crate::error::{AuthError, AuthResult};

/// User account entity
#[derive(Debug, Clone)]
pub struct UserAccount {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Unique email (case-sensitive as stored)
    pub email: Email,
    /// Bcrypt hash of the password
    pub password: UserPassword,
    pub is_email_verified: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// Create an unverified, non-admin account
    pub fn new(email: Email, password: UserPassword, now: DateTime<Utc>) -> Self {
        Self {
            user_id: UserId::new(),
            email,
            password,
            is_email_verified: false,
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Fail unless the email has been confirmed
    pub fn ensure_email_verified(&self) -> AuthResult<()> {
        if self.is_email_verified {
            Ok(())
        } else {
            Err(AuthError::EmailIsNotVerified)
        }
    }

    /// Fail if the email has already been confirmed
    pub fn ensure_email_not_verified(&self) -> AuthResult<()> {
        if self.is_email_verified {
            Err(AuthError::EmailIsAlreadyVerified)
        } else {
            Ok(())
        }
    }

    /// Mark the email as confirmed
    pub fn verify_email(&mut self, now: DateTime<Utc>) -> AuthResult<()> {
        self.ensure_email_not_verified()?;
        self.is_email_verified = true;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> UserAccount {
        UserAccount::new(
            Email::new("user@example.com").unwrap(),
            UserPassword::from_bcrypt_string(
                "$2b$04$abcdefghijklmnopqrstuuG8Q7Kx0h1t2lD1Qe5sXyQpS5PjJcW9a",
            )
            .unwrap(),
            Utc::now(),
        )
    }

    #[test]
    fn test_new_account_is_unverified() {
        let account = account();
        assert!(!account.is_email_verified);
        assert!(!account.is_admin);
        assert!(matches!(
            account.ensure_email_verified(),
            Err(AuthError::EmailIsNotVerified)
        ));
    }

    #[test]
    fn test_verify_email_once() {
        let mut account = account();
        let later = account.created_at + chrono::Duration::minutes(3);

        account.verify_email(later).unwrap();
        assert!(account.is_email_verified);
        assert_eq!(account.updated_at, later);

        assert!(matches!(
            account.verify_email(later),
            Err(AuthError::EmailIsAlreadyVerified)
        ));
    }
}
