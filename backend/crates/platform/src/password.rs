//! Password Hashing and Verification
//!
//! bcrypt-based credential hashing with:
//! - Explicit rejection of passwords longer than bcrypt's 72-byte input limit
//!   (bcrypt would otherwise silently ignore everything past byte 72)
//! - Unicode NFKC normalization before any length check
//! - Zeroization of clear-text passwords
//! - Hashing and verification dispatched to a bounded [`CpuPool`]
//!
//! ## Example
//! ```rust,no_run
//! use platform::blocking::CpuPool;
//! use platform::password::{ClearTextPassword, PasswordHasher};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let hasher = PasswordHasher::new(bcrypt::DEFAULT_COST, CpuPool::new(2));
//! let hashed = hasher.hash(ClearTextPassword::new("correct horse".to_string())?).await?;
//! assert!(hasher.verify(ClearTextPassword::candidate("correct horse".to_string()), hashed).await?);
//! # Ok(())
//! # }
//! ```

use std::fmt;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::blocking::CpuPool;

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum encoded password length in bytes (bcrypt input limit)
pub const MAX_PASSWORD_BYTES: usize = 72;

/// bcrypt cost used when none is configured
pub const DEFAULT_HASH_COST: u32 = bcrypt::DEFAULT_COST;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} bytes when UTF-8 encoded (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Not `Clone`, and `Debug` output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a password that is about to be hashed and stored
    ///
    /// Applies the full policy: NFKC normalization, non-blank, at least
    /// [`MIN_PASSWORD_LENGTH`] characters, at most [`MAX_PASSWORD_BYTES`]
    /// bytes, no control characters.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let normalized = Self::candidate(raw);
        let value = normalized.0.as_str();

        if value.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = value.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if value.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_BYTES,
                actual: value.len(),
            });
        }

        if value
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(normalized)
    }

    /// Create a password that will only be compared against a stored hash
    ///
    /// Only normalizes. Policy is not applied because a candidate that
    /// violates it simply fails to verify.
    pub fn candidate(raw: String) -> Self {
        let normalized: String = raw.nfkc().collect();
        let mut raw = raw;
        raw.zeroize();
        Self(normalized)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Whether bcrypt can consume every byte of this password
    pub fn fits_hash_input(&self) -> bool {
        self.as_bytes().len() <= MAX_PASSWORD_BYTES
    }

    /// Hash synchronously with the given bcrypt cost
    ///
    /// Blocks the current thread; prefer [`PasswordHasher::hash`].
    pub fn hash_blocking(&self, cost: u32) -> Result<HashedPassword, PasswordHashError> {
        if !self.fits_hash_input() {
            return Err(PasswordHashError::HashingFailed(format!(
                "input exceeds {MAX_PASSWORD_BYTES} bytes"
            )));
        }

        let hash = bcrypt::hash(self.as_bytes(), cost)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword { hash })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// bcrypt hash in modular crypt format (`$2b$<cost>$<salt+hash>`)
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from a stored bcrypt string
    pub fn from_bcrypt_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        hash.parse::<bcrypt::HashParts>()
            .map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    /// Get the bcrypt string for storage
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Verify synchronously; prefer [`PasswordHasher::verify`]
    ///
    /// A candidate longer than [`MAX_PASSWORD_BYTES`] never matches, even if
    /// its first 72 bytes would.
    pub fn verify_blocking(&self, password: &ClearTextPassword) -> Result<bool, PasswordHashError> {
        if !password.fits_hash_input() {
            return Ok(false);
        }

        bcrypt::verify(password.as_bytes(), &self.hash)
            .map_err(|_| PasswordHashError::InvalidHashFormat)
    }

    /// bcrypt cost factor encoded in the hash
    pub fn cost(&self) -> Option<u32> {
        self.hash
            .parse::<bcrypt::HashParts>()
            .ok()
            .map(|parts| parts.get_cost())
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Hasher (off the request path)
// ============================================================================

/// Credential hasher bound to a bcrypt cost and a CPU pool
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    pool: CpuPool,
}

impl PasswordHasher {
    pub fn new(cost: u32, pool: CpuPool) -> Self {
        Self { cost, pool }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash on the CPU pool
    pub async fn hash(
        &self,
        password: ClearTextPassword,
    ) -> Result<HashedPassword, PasswordHashError> {
        let cost = self.cost;
        self.pool
            .run(move || password.hash_blocking(cost))
            .await
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?
    }

    /// Verify on the CPU pool
    pub async fn verify(
        &self,
        password: ClearTextPassword,
        hashed: HashedPassword,
    ) -> Result<bool, PasswordHashError> {
        self.pool
            .run(move || hashed.verify_blocking(&password))
            .await
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?
    }
}

// ============================================================================
// Tests
// ============================================================================
