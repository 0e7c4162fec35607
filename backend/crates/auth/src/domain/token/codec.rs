//! Token Codec
//!
//! Signs and verifies tokens with a shared HMAC secret. Expiry is checked
//! against the injected [`Clock`], never inside `jsonwebtoken`.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use platform::clock::Clock;
use uuid::Uuid;

use super::{
    AccessClaims, AccessTokenData, AccessToken, RefreshClaims, RefreshToken, RegistrationClaims,
    RegistrationToken, Token, TokenClaims, TokenKind,
};
use crate::error::{AuthError, AuthResult};

/// Whether `decode` rejects tokens past their `exp`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryPolicy {
    Enforce,
    /// Used for refresh tokens, whose lifetime is governed by the session row
    Skip,
}

/// Lifetime of each token kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenTtls {
    pub registration: Duration,
    pub access: Duration,
    pub refresh: Duration,
}

impl Default for TokenTtls {
    fn default() -> Self {
        Self {
            registration: Duration::minutes(10),
            access: Duration::minutes(60),
            refresh: Duration::hours(24),
        }
    }
}

/// Issues and decodes signed tokens
#[derive(Clone)]
pub struct TokenCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttls: TokenTtls,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Build a codec for an HMAC algorithm (HS256, HS384 or HS512)
    pub fn new(
        secret: &[u8],
        algorithm: Algorithm,
        ttls: TokenTtls,
        clock: Arc<dyn Clock>,
    ) -> AuthResult<Self> {
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(AuthError::Internal(format!(
                "unsupported token algorithm {algorithm:?}, expected HMAC"
            )));
        }
        if secret.is_empty() {
            return Err(AuthError::Internal("token secret is empty".to_string()));
        }

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttls,
            clock,
        })
    }

    pub fn ttls(&self) -> &TokenTtls {
        &self.ttls
    }

    // ========================================================================
    // Issue
    // ========================================================================

    pub fn issue_registration(&self, subject: &str) -> AuthResult<RegistrationToken> {
        let (jti, exp) = self.stamp(self.ttls.registration);
        self.sign(RegistrationClaims {
            jti,
            token_kind: TokenKind::Registration,
            sub: subject.to_string(),
            exp,
        })
    }

    pub fn issue_access(&self, subject: &str, data: AccessTokenData) -> AuthResult<AccessToken> {
        let (jti, exp) = self.stamp(self.ttls.access);
        self.sign(AccessClaims {
            jti,
            token_kind: TokenKind::Access,
            sub: subject.to_string(),
            exp,
            data,
        })
    }

    pub fn issue_refresh(&self, subject: &str) -> AuthResult<RefreshToken> {
        let (jti, exp) = self.stamp(self.ttls.refresh);
        self.sign(RefreshClaims {
            jti,
            token_kind: TokenKind::Refresh,
            sub: subject.to_string(),
            exp,
        })
    }

    fn stamp(&self, ttl: Duration) -> (String, i64) {
        let exp = (self.clock.now() + ttl).timestamp();
        (Uuid::new_v4().to_string(), exp)
    }

    fn sign<C: TokenClaims>(&self, claims: C) -> AuthResult<Token<C>> {
        let encoded = jsonwebtoken::encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))?;
        Ok(Token::from_parts(claims, encoded))
    }

    // ========================================================================
    // Decode
    // ========================================================================

    /// Verify `encoded` and read it as a token of kind `C`
    ///
    /// Signature and structure failures yield `TokenVerificationFailed`,
    /// schema or kind mismatches yield `WrongTokenFormat`.
    pub fn decode<C: TokenClaims>(&self, encoded: &str, expiry: ExpiryPolicy) -> AuthResult<Token<C>> {
        let data = jsonwebtoken::decode::<serde_json::Value>(
            encoded,
            &self.decoding_key,
            &self.validation,
        )
        .map_err(|e| AuthError::TokenVerificationFailed(e.to_string()))?;

        let claims: C = serde_json::from_value(data.claims)
            .map_err(|e| AuthError::WrongTokenFormat(e.to_string()))?;

        if claims.token_kind() != C::KIND {
            return Err(AuthError::WrongTokenFormat(format!(
                "expected {} token, got {}",
                C::KIND,
                claims.token_kind()
            )));
        }

        if expiry == ExpiryPolicy::Enforce && claims.exp() <= self.clock.now().timestamp() {
            return Err(AuthError::TokenVerificationFailed(
                "token has expired".to_string(),
            ));
        }

        Ok(Token::from_parts(claims, encoded.to_string()))
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .field("ttls", &self.ttls)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::clock::ManualClock;
    use serde_json::json;

    const SECRET: &[u8] = b"test-secret-test-secret-test-secret!";

    fn codec_with(clock: Arc<ManualClock>) -> TokenCodec {
        TokenCodec::new(SECRET, Algorithm::HS256, TokenTtls::default(), clock).unwrap()
    }

    fn codec() -> TokenCodec {
        codec_with(Arc::new(ManualClock::starting_now()))
    }

    #[test]
    fn test_roundtrip_each_kind() {
        let codec = codec();

        let registration = codec.issue_registration("user-1").unwrap();
        let decoded: RegistrationToken = codec
            .decode(registration.encoded(), ExpiryPolicy::Enforce)
            .unwrap();
        assert_eq!(decoded, registration);

        let access = codec
            .issue_access("user-1", AccessTokenData { is_admin: true })
            .unwrap();
        let decoded: AccessToken = codec.decode(access.encoded(), ExpiryPolicy::Enforce).unwrap();
        assert_eq!(decoded, access);
        assert!(decoded.data().is_admin);

        let refresh = codec.issue_refresh("user-1").unwrap();
        let decoded: RefreshToken = codec.decode(refresh.encoded(), ExpiryPolicy::Skip).unwrap();
        assert_eq!(decoded, refresh);
    }

    #[test]
    fn test_fresh_jti_per_issue() {
        let codec = codec();
        let a = codec.issue_refresh("user-1").unwrap();
        let b = codec.issue_refresh("user-1").unwrap();
        assert_ne!(a.jti(), b.jti());
        assert_ne!(a.encoded(), b.encoded());
    }

    #[test]
    fn test_exp_uses_kind_ttl() {
        let clock = Arc::new(ManualClock::starting_now());
        let codec = codec_with(clock.clone());
        let now = clock.now().timestamp();

        let access = codec.issue_access("u", AccessTokenData::default()).unwrap();
        assert_eq!(access.claims().exp, now + 60 * 60);

        let registration = codec.issue_registration("u").unwrap();
        assert_eq!(registration.claims().exp, now + 10 * 60);

        let refresh = codec.issue_refresh("u").unwrap();
        assert_eq!(refresh.claims().exp, now + 24 * 60 * 60);
    }

    #[test]
    fn test_expiry_policy() {
        let clock = Arc::new(ManualClock::starting_now());
        let codec = codec_with(clock.clone());
        let access = codec.issue_access("u", AccessTokenData::default()).unwrap();

        clock.advance(Duration::minutes(61));

        let err = codec
            .decode::<AccessClaims>(access.encoded(), ExpiryPolicy::Enforce)
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenVerificationFailed(_)));

        let skipped = codec
            .decode::<AccessClaims>(access.encoded(), ExpiryPolicy::Skip)
            .unwrap();
        assert_eq!(skipped, access);
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let codec = codec();
        let refresh = codec.issue_refresh("u").unwrap();

        let err = codec
            .decode::<RegistrationClaims>(refresh.encoded(), ExpiryPolicy::Enforce)
            .unwrap_err();
        assert!(matches!(err, AuthError::WrongTokenFormat(_)));

        let access = codec.issue_access("u", AccessTokenData::default()).unwrap();
        let err = codec
            .decode::<RefreshClaims>(access.encoded(), ExpiryPolicy::Skip)
            .unwrap_err();
        assert!(matches!(err, AuthError::WrongTokenFormat(_)));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let codec = codec();
        let access = codec.issue_access("u", AccessTokenData::default()).unwrap();

        let mut parts: Vec<String> = access.encoded().split('.').map(str::to_string).collect();
        let forged = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &json!({
                "jti": access.jti(),
                "token_kind": "ACCESS",
                "sub": "u",
                "exp": access.claims().exp,
                "data": { "is_admin": true }
            }),
            &EncodingKey::from_secret(b"another-secret"),
        )
        .unwrap();
        parts[1] = forged.split('.').nth(1).unwrap().to_string();

        let err = codec
            .decode::<AccessClaims>(&parts.join("."), ExpiryPolicy::Enforce)
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenVerificationFailed(_)));

        let err = codec
            .decode::<AccessClaims>("not-a-token", ExpiryPolicy::Enforce)
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenVerificationFailed(_)));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let other = TokenCodec::new(
            b"a-completely-different-secret-value",
            Algorithm::HS256,
            TokenTtls::default(),
            Arc::new(ManualClock::starting_now()),
        )
        .unwrap();
        let token = other.issue_registration("u").unwrap();

        let err = codec()
            .decode::<RegistrationClaims>(token.encoded(), ExpiryPolicy::Enforce)
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenVerificationFailed(_)));
    }

    #[test]
    fn test_extra_claim_is_wrong_format() {
        let clock = Arc::new(ManualClock::starting_now());
        let codec = codec_with(clock.clone());
        let encoded = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &json!({
                "jti": "x",
                "token_kind": "REFRESH",
                "sub": "u",
                "exp": clock.now().timestamp() + 60,
                "admin": true
            }),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let err = codec
            .decode::<RefreshClaims>(&encoded, ExpiryPolicy::Skip)
            .unwrap_err();
        assert!(matches!(err, AuthError::WrongTokenFormat(_)));
    }

    #[test]
    fn test_subject_id() {
        let codec = codec();
        let user_id = crate::domain::value_object::user_id::UserId::new();
        let token = codec.issue_registration(&user_id.to_string()).unwrap();
        assert_eq!(token.subject_id().unwrap(), user_id);

        let token = codec.issue_registration("not-a-uuid").unwrap();
        assert!(matches!(
            token.subject_id(),
            Err(AuthError::WrongTokenFormat(_))
        ));
    }

    #[test]
    fn test_non_hmac_algorithm_rejected() {
        let result = TokenCodec::new(
            SECRET,
            Algorithm::RS256,
            TokenTtls::default(),
            Arc::new(ManualClock::starting_now()),
        );
        assert!(result.is_err());
    }
}
