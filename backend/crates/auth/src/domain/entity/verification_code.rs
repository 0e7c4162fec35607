//! Verification Code Entity
//!
//! Short numeric one-time code proving control of an email address.
//! One live code per user; a resend replaces it in place.

use chrono::{DateTime, Duration, Utc};
use platform::crypto::{constant_time_eq, random_digits};

use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// Verification code entity, keyed by the owning user
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationCode {
    pub user_id: UserId,
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl VerificationCode {
    /// Issue a fresh code of `len` digits valid for `ttl`
    pub fn create(user_id: UserId, len: usize, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            code: random_digits(len),
            issued_at: now,
            expires_at: now + ttl,
        }
    }

    /// Replace the code once the resend cooldown has passed
    ///
    /// The new code always differs from the previous one.
    pub fn update_for_resend(
        &mut self,
        cooldown: Duration,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> AuthResult<()> {
        if now < self.issued_at + cooldown {
            return Err(AuthError::VerCodeCooldownIsNotOver);
        }

        let len = self.code.len();
        let mut code = random_digits(len);
        while len > 0 && code == self.code {
            code = random_digits(len);
        }

        self.code = code;
        self.issued_at = now;
        self.expires_at = now + ttl;
        Ok(())
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Check a submitted code; expiry is reported before a mismatch
    pub fn check_code(&self, candidate: &str, now: DateTime<Utc>) -> AuthResult<()> {
        if self.is_expired(now) {
            return Err(AuthError::VerCodeIsExpired);
        }
        if !constant_time_eq(self.code.as_bytes(), candidate.as_bytes()) {
            return Err(AuthError::VerCodeIsNotCorrect);
        }
        Ok(())
    }
}

impl std::fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationCode")
            .field("user_id", &self.user_id)
            .field("code", &"[REDACTED]")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEN: usize = 6;

    fn ttl() -> Duration {
        Duration::minutes(10)
    }

    fn cooldown() -> Duration {
        Duration::seconds(60)
    }

    #[test]
    fn test_create() {
        let now = Utc::now();
        let code = VerificationCode::create(UserId::new(), LEN, ttl(), now);

        assert_eq!(code.code.len(), LEN);
        assert!(code.code.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(code.issued_at, now);
        assert_eq!(code.expires_at, now + ttl());
    }

    #[test]
    fn test_check_code() {
        let now = Utc::now();
        let code = VerificationCode::create(UserId::new(), LEN, ttl(), now);
        let submitted = code.code.clone();

        code.check_code(&submitted, now + Duration::minutes(9)).unwrap();
        // not consumed by a successful check
        code.check_code(&submitted, now).unwrap();

        let wrong = if submitted == "000000" { "111111" } else { "000000" };
        assert!(matches!(
            code.check_code(wrong, now),
            Err(AuthError::VerCodeIsNotCorrect)
        ));
    }

    #[test]
    fn test_check_code_is_exact() {
        let now = Utc::now();
        let code = VerificationCode::create(UserId::new(), LEN, ttl(), now);

        for padded in [
            format!(" {}", code.code),
            format!("{} ", code.code),
            format!("{}\n", code.code),
        ] {
            assert!(matches!(
                code.check_code(&padded, now),
                Err(AuthError::VerCodeIsNotCorrect)
            ));
        }
    }

    #[test]
    fn test_expired_before_mismatch() {
        let now = Utc::now();
        let code = VerificationCode::create(UserId::new(), LEN, ttl(), now);
        let late = now + ttl() + Duration::seconds(1);

        assert!(matches!(
            code.check_code(&code.code.clone(), late),
            Err(AuthError::VerCodeIsExpired)
        ));
        assert!(matches!(
            code.check_code("not-a-code", late),
            Err(AuthError::VerCodeIsExpired)
        ));
    }

    #[test]
    fn test_resend_cooldown() {
        let now = Utc::now();
        let mut code = VerificationCode::create(UserId::new(), LEN, ttl(), now);
        let before = code.clone();

        assert!(matches!(
            code.update_for_resend(cooldown(), ttl(), now + Duration::seconds(59)),
            Err(AuthError::VerCodeCooldownIsNotOver)
        ));
        assert_eq!(code, before);

        let later = now + cooldown();
        code.update_for_resend(cooldown(), ttl(), later).unwrap();
        assert_ne!(code.code, before.code);
        assert_eq!(code.issued_at, later);
        assert_eq!(code.expires_at, later + ttl());
    }

    #[test]
    fn test_debug_hides_code() {
        let code = VerificationCode::create(UserId::new(), LEN, ttl(), Utc::now());
        let debug = format!("{:?}", code);
        assert!(debug.contains("code: \"[REDACTED]\""));
    }
}
