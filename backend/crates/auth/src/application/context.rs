//! Shared Use Case Dependencies
//!
//! Everything a use case needs besides its repositories.

use std::sync::Arc;

use platform::clock::Clock;
use platform::password::PasswordHasher;

use crate::application::config::AuthConfig;
use crate::domain::token::TokenCodec;
use crate::error::AuthResult;

/// Configuration, clock, token codec and password hasher, cheap to clone
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub config: Arc<AuthConfig>,
    pub clock: Arc<dyn Clock>,
    pub codec: Arc<TokenCodec>,
    pub hasher: Arc<PasswordHasher>,
}

impl AuthContext {
    /// Build the codec and hasher described by `config`
    pub fn new(config: AuthConfig, clock: Arc<dyn Clock>) -> AuthResult<Self> {
        let codec = config.token_codec(Arc::clone(&clock))?;
        let hasher = config.password_hasher();
        Ok(Self {
            config: Arc::new(config),
            clock,
            codec: Arc::new(codec),
            hasher: Arc::new(hasher),
        })
    }
}
