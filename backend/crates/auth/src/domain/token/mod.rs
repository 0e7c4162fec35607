//! Signed Tokens
//!
//! Compact JWS tokens of three kinds:
//! - `RegistrationToken` - returned by sign-up, authorizes email verification
//! - `AccessToken` - short-lived, carries [`AccessTokenData`]
//! - `RefreshToken` - rotated on every use, bound to a session row
//!
//! Tokens are immutable once built and compare by claims and encoding.

pub mod claims;
pub mod codec;

use chrono::{DateTime, Utc};
use std::fmt;

use crate::domain::value_object::user_id::{UserId, user_id_from_subject};
use crate::error::AuthResult;

pub use claims::{
    AccessClaims, AccessTokenData, RefreshClaims, RegistrationClaims, TokenClaims, TokenKind,
};
pub use codec::{ExpiryPolicy, TokenCodec, TokenTtls};

/// A decoded token together with its signed encoding
#[derive(Clone, PartialEq, Eq)]
pub struct Token<C: TokenClaims> {
    claims: C,
    encoded: String,
}

pub type RegistrationToken = Token<RegistrationClaims>;
pub type AccessToken = Token<AccessClaims>;
pub type RefreshToken = Token<RefreshClaims>;

impl<C: TokenClaims> Token<C> {
    pub(crate) fn from_parts(claims: C, encoded: String) -> Self {
        Self { claims, encoded }
    }

    pub fn claims(&self) -> &C {
        &self.claims
    }

    /// Signed compact encoding, as handed to clients
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    pub fn into_encoded(self) -> String {
        self.encoded
    }

    pub fn jti(&self) -> &str {
        self.claims.jti()
    }

    pub fn kind(&self) -> TokenKind {
        self.claims.token_kind()
    }

    /// Parse the subject into the owning user's id
    pub fn subject_id(&self) -> AuthResult<UserId> {
        user_id_from_subject(self.claims.subject())
    }

    /// Embedded expiry, `None` if out of chrono's range
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.claims.exp(), 0)
    }
}

impl AccessToken {
    pub fn data(&self) -> &AccessTokenData {
        &self.claims.data
    }
}

impl<C: TokenClaims> fmt::Debug for Token<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("claims", &self.claims)
            .field("encoded", &"[REDACTED]")
            .finish()
    }
}
