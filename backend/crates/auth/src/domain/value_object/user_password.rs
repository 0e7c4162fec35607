//! User Password Value Object
//!
//! Domain wrapper over `platform::password` with auth error mapping.
//!
//! ## Usage
//! ```rust,no_run
//! use auth::domain::value_object::user_password::{RawPassword, UserPassword};
//! use platform::blocking::CpuPool;
//! use platform::password::PasswordHasher;
//!
//! # async fn demo() -> auth::AuthResult<()> {
//! let hasher = PasswordHasher::new(12, CpuPool::new(2));
//! let stored = UserPassword::hash(&hasher, RawPassword::new("MySecurePass123!".to_string())?).await?;
//! stored.check(&hasher, "MySecurePass123!".to_string()).await?;
//! # Ok(())
//! # }
//! ```

use platform::password::{ClearTextPassword, HashedPassword, PasswordHasher};
use std::fmt;

use crate::error::{AuthError, AuthResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Password chosen at registration, policy-checked
///
/// Memory is zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Validate a new password
    ///
    /// Passwords longer than 72 bytes are rejected rather than truncated.
    pub fn new(raw: String) -> AuthResult<Self> {
        ClearTextPassword::new(raw)
            .map(Self)
            .map_err(|e| AuthError::PasswordPolicy(e.to_string()))
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Stored bcrypt hash of a user's password
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash on the hasher's CPU pool
    pub async fn hash(hasher: &PasswordHasher, raw: RawPassword) -> AuthResult<Self> {
        let hashed = hasher.hash(raw.0).await?;
        Ok(Self(hashed))
    }

    /// Restore from a stored bcrypt string
    pub fn from_bcrypt_string(value: impl Into<String>) -> AuthResult<Self> {
        HashedPassword::from_bcrypt_string(value)
            .map(Self)
            .map_err(|_| AuthError::Internal("Invalid password hash in storage".to_string()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Check a login attempt, failing with `WrongPassword` on mismatch
    pub async fn check(&self, hasher: &PasswordHasher, candidate: String) -> AuthResult<()> {
        let candidate = ClearTextPassword::candidate(candidate);
        if hasher.verify(candidate, self.0.clone()).await? {
            Ok(())
        } else {
            Err(AuthError::WrongPassword)
        }
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
