//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::Algorithm;
use platform::blocking::CpuPool;
use platform::clock::Clock;
use platform::crypto::{from_base64, random_bytes};
use platform::password::{DEFAULT_HASH_COST, PasswordHasher};
use thiserror::Error;

use crate::domain::token::{TokenCodec, TokenTtls};
use crate::error::AuthResult;

/// Minimum accepted token secret length in bytes
pub const MIN_TOKEN_SECRET_BYTES: usize = 32;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for token signing
    pub token_secret: Vec<u8>,
    /// HS256, HS384 or HS512
    pub token_algorithm: Algorithm,
    pub registration_token_ttl: Duration,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    /// Lifetime of a session row, independent of its refresh token's `exp`
    pub session_ttl: Duration,
    pub verification_code_ttl: Duration,
    /// Minimum time between two verification codes for one user
    pub verification_code_resend_cooldown: Duration,
    /// Number of digits in a verification code
    pub verification_code_len: usize,
    /// bcrypt cost factor
    pub password_hash_cost: u32,
    /// Concurrent hashing jobs allowed on the CPU pool
    pub hashing_workers: usize,
}

/// Defaults with a fresh random token secret
///
/// Tokens signed under a default config do not verify in another process;
/// deployments sharing tokens load the secret through [`AuthConfig::from_env`].
impl Default for AuthConfig {
    fn default() -> Self {
        let ttls = TokenTtls::default();
        Self {
            token_secret: random_bytes(MIN_TOKEN_SECRET_BYTES),
            token_algorithm: Algorithm::HS256,
            registration_token_ttl: ttls.registration,
            access_token_ttl: ttls.access,
            refresh_token_ttl: ttls.refresh,
            session_ttl: Duration::hours(24),
            verification_code_ttl: Duration::minutes(10),
            verification_code_resend_cooldown: Duration::seconds(60),
            verification_code_len: 6,
            password_hash_cost: DEFAULT_HASH_COST,
            hashing_workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(2),
        }
    }
}

impl AuthConfig {
    /// Create config with a random token secret, same as [`AuthConfig::default`]
    pub fn with_random_secret() -> Self {
        Self::default()
    }

    /// Create config for development (cheaper hashing)
    pub fn development() -> Self {
        Self {
            password_hash_cost: 8,
            ..Self::with_random_secret()
        }
    }

    /// Load from `AUTH_*` environment variables
    ///
    /// `AUTH_TOKEN_SECRET` (base64) is required; everything else falls back
    /// to [`AuthConfig::default`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("AUTH_TOKEN_SECRET").ok_or(ConfigError::Missing("AUTH_TOKEN_SECRET"))?;
        let token_secret = from_base64(secret.trim()).map_err(|e| ConfigError::Invalid {
            key: "AUTH_TOKEN_SECRET",
            reason: e.to_string(),
        })?;
        if token_secret.len() < MIN_TOKEN_SECRET_BYTES {
            return Err(ConfigError::Invalid {
                key: "AUTH_TOKEN_SECRET",
                reason: format!(
                    "must decode to at least {MIN_TOKEN_SECRET_BYTES} bytes (got {})",
                    token_secret.len()
                ),
            });
        }

        let defaults = Self::default();
        let secs = |key: &'static str, default: Duration| -> Result<Duration, ConfigError> {
            match parse::<i64>(&lookup, key)? {
                None => Ok(default),
                Some(value) => Duration::try_seconds(value)
                    .filter(|d| *d > Duration::zero())
                    .ok_or(ConfigError::Invalid {
                        key,
                        reason: "must be a positive number of seconds".to_string(),
                    }),
            }
        };

        let token_algorithm = parse::<Algorithm>(&lookup, "AUTH_TOKEN_ALGORITHM")?
            .unwrap_or(defaults.token_algorithm);
        if !matches!(
            token_algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(ConfigError::Invalid {
                key: "AUTH_TOKEN_ALGORITHM",
                reason: format!("{token_algorithm:?} is not an HMAC algorithm"),
            });
        }

        let password_hash_cost = parse::<u32>(&lookup, "AUTH_PASSWORD_HASH_COST")?
            .unwrap_or(defaults.password_hash_cost);
        if !(4..=31).contains(&password_hash_cost) {
            return Err(ConfigError::Invalid {
                key: "AUTH_PASSWORD_HASH_COST",
                reason: "bcrypt cost must be between 4 and 31".to_string(),
            });
        }

        let verification_code_len = parse::<usize>(&lookup, "AUTH_VERIFICATION_CODE_LEN")?
            .unwrap_or(defaults.verification_code_len);
        if !(4..=12).contains(&verification_code_len) {
            return Err(ConfigError::Invalid {
                key: "AUTH_VERIFICATION_CODE_LEN",
                reason: "must be between 4 and 12 digits".to_string(),
            });
        }

        Ok(Self {
            token_secret,
            token_algorithm,
            registration_token_ttl: secs(
                "AUTH_REGISTRATION_TOKEN_TTL_SECS",
                defaults.registration_token_ttl,
            )?,
            access_token_ttl: secs("AUTH_ACCESS_TOKEN_TTL_SECS", defaults.access_token_ttl)?,
            refresh_token_ttl: secs("AUTH_REFRESH_TOKEN_TTL_SECS", defaults.refresh_token_ttl)?,
            session_ttl: secs("AUTH_SESSION_TTL_SECS", defaults.session_ttl)?,
            verification_code_ttl: secs(
                "AUTH_VERIFICATION_CODE_TTL_SECS",
                defaults.verification_code_ttl,
            )?,
            verification_code_resend_cooldown: secs(
                "AUTH_VERIFICATION_CODE_COOLDOWN_SECS",
                defaults.verification_code_resend_cooldown,
            )?,
            verification_code_len,
            password_hash_cost,
            hashing_workers: parse::<usize>(&lookup, "AUTH_HASHING_WORKERS")?
                .unwrap_or(defaults.hashing_workers),
        })
    }

    pub fn token_ttls(&self) -> TokenTtls {
        TokenTtls {
            registration: self.registration_token_ttl,
            access: self.access_token_ttl,
            refresh: self.refresh_token_ttl,
        }
    }

    /// Build the token codec for this configuration
    pub fn token_codec(&self, clock: Arc<dyn Clock>) -> AuthResult<TokenCodec> {
        TokenCodec::new(
            &self.token_secret,
            self.token_algorithm,
            self.token_ttls(),
            clock,
        )
    }

    /// Build a password hasher with its own CPU pool
    pub fn password_hasher(&self) -> PasswordHasher {
        PasswordHasher::new(self.password_hash_cost, CpuPool::new(self.hashing_workers))
    }
}

fn parse<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                key,
                reason: e.to_string(),
            })
        })
        .transpose()
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("token_algorithm", &self.token_algorithm)
            .field("registration_token_ttl", &self.registration_token_ttl)
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("session_ttl", &self.session_ttl)
            .field("verification_code_ttl", &self.verification_code_ttl)
            .field(
                "verification_code_resend_cooldown",
                &self.verification_code_resend_cooldown,
            )
            .field("verification_code_len", &self.verification_code_len)
            .field("password_hash_cost", &self.password_hash_cost)
            .field("hashing_workers", &self.hashing_workers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::crypto::to_base64;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.access_token_ttl, Duration::minutes(60));
        assert_eq!(config.refresh_token_ttl, Duration::hours(24));
        assert_eq!(config.registration_token_ttl, Duration::minutes(10));
        assert_eq!(config.verification_code_resend_cooldown, Duration::seconds(60));
        assert_eq!(config.verification_code_len, 6);
        assert_eq!(config.password_hash_cost, DEFAULT_HASH_COST);
    }

    #[test]
    fn test_default_secret_is_random() {
        let a = AuthConfig::default();
        let b = AuthConfig::default();
        assert_eq!(a.token_secret.len(), MIN_TOKEN_SECRET_BYTES);
        assert_ne!(a.token_secret, vec![0u8; MIN_TOKEN_SECRET_BYTES]);
        assert_ne!(a.token_secret, b.token_secret);
    }

    #[test]
    fn test_random_secret_differs() {
        let a = AuthConfig::with_random_secret();
        let b = AuthConfig::with_random_secret();
        assert_eq!(a.token_secret.len(), MIN_TOKEN_SECRET_BYTES);
        assert_ne!(a.token_secret, b.token_secret);
    }

    #[test]
    fn test_from_lookup() {
        let secret = to_base64(&[7u8; 48]);
        let config = AuthConfig::from_lookup(lookup(&[
            ("AUTH_TOKEN_SECRET", secret.as_str()),
            ("AUTH_TOKEN_ALGORITHM", "HS512"),
            ("AUTH_ACCESS_TOKEN_TTL_SECS", "300"),
            ("AUTH_PASSWORD_HASH_COST", "10"),
        ]))
        .unwrap();

        assert_eq!(config.token_secret, vec![7u8; 48]);
        assert_eq!(config.token_algorithm, Algorithm::HS512);
        assert_eq!(config.access_token_ttl, Duration::minutes(5));
        assert_eq!(config.password_hash_cost, 10);
        assert_eq!(config.refresh_token_ttl, Duration::hours(24));
    }

    #[test]
    fn test_from_lookup_errors() {
        assert!(matches!(
            AuthConfig::from_lookup(lookup(&[])),
            Err(ConfigError::Missing("AUTH_TOKEN_SECRET"))
        ));

        let short = to_base64(&[1u8; 16]);
        assert!(matches!(
            AuthConfig::from_lookup(lookup(&[("AUTH_TOKEN_SECRET", short.as_str())])),
            Err(ConfigError::Invalid { key: "AUTH_TOKEN_SECRET", .. })
        ));

        let secret = to_base64(&[1u8; 32]);
        assert!(matches!(
            AuthConfig::from_lookup(lookup(&[
                ("AUTH_TOKEN_SECRET", secret.as_str()),
                ("AUTH_TOKEN_ALGORITHM", "RS256"),
            ])),
            Err(ConfigError::Invalid { key: "AUTH_TOKEN_ALGORITHM", .. })
        ));
        assert!(matches!(
            AuthConfig::from_lookup(lookup(&[
                ("AUTH_TOKEN_SECRET", secret.as_str()),
                ("AUTH_SESSION_TTL_SECS", "a day"),
            ])),
            Err(ConfigError::Invalid { key: "AUTH_SESSION_TTL_SECS", .. })
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AuthConfig::with_random_secret();
        let debug = format!("{:?}", config);
        assert!(debug.contains("[REDACTED]"));
    }
}
