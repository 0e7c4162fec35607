//! Token Claims
//!
//! One fixed claim struct per token kind. Unknown fields are rejected so a
//! token of one kind can never be read as another with extra data ignored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminator carried in every token's `token_kind` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Registration,
    Access,
    Refresh,
}

impl TokenKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Registration => "REGISTRATION",
            Self::Access => "ACCESS",
            Self::Refresh => "REFRESH",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common view over the claim structs
pub trait TokenClaims:
    Serialize + DeserializeOwned + Clone + PartialEq + Eq + fmt::Debug + Send + Sync + 'static
{
    const KIND: TokenKind;

    fn jti(&self) -> &str;
    fn token_kind(&self) -> TokenKind;
    fn subject(&self) -> &str;
    /// Expiry, seconds since the Unix epoch
    fn exp(&self) -> i64;
}

/// Claims of a registration token (proves a fresh sign-up)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrationClaims {
    pub jti: String,
    pub token_kind: TokenKind,
    pub sub: String,
    pub exp: i64,
}

/// Payload carried by access tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessTokenData {
    pub is_admin: bool,
}

/// Claims of an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessClaims {
    pub jti: String,
    pub token_kind: TokenKind,
    pub sub: String,
    pub exp: i64,
    pub data: AccessTokenData,
}

/// Claims of a refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefreshClaims {
    pub jti: String,
    pub token_kind: TokenKind,
    pub sub: String,
    pub exp: i64,
}

impl TokenClaims for RegistrationClaims {
    const KIND: TokenKind = TokenKind::Registration;

    fn jti(&self) -> &str {
        &self.jti
    }
    fn token_kind(&self) -> TokenKind {
        self.token_kind
    }
    fn subject(&self) -> &str {
        &self.sub
    }
    fn exp(&self) -> i64 {
        self.exp
    }
}

impl TokenClaims for AccessClaims {
    const KIND: TokenKind = TokenKind::Access;

    fn jti(&self) -> &str {
        &self.jti
    }
    fn token_kind(&self) -> TokenKind {
        self.token_kind
    }
    fn subject(&self) -> &str {
        &self.sub
    }
    fn exp(&self) -> i64 {
        self.exp
    }
}

impl TokenClaims for RefreshClaims {
    const KIND: TokenKind = TokenKind::Refresh;

    fn jti(&self) -> &str {
        &self.jti
    }
    fn token_kind(&self) -> TokenKind {
        self.token_kind
    }
    fn subject(&self) -> &str {
        &self.sub
    }
    fn exp(&self) -> i64 {
        self.exp
    }
}
