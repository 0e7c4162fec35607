//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::blocking::CpuPoolError;
use platform::password::PasswordHashError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    // ------------------------------------------------------------------
    // Accounts
    // ------------------------------------------------------------------
    #[error("No user with this email")]
    UserWithEmailDoesntExist,

    #[error("Wrong password")]
    WrongPassword,

    #[error("Email is not verified")]
    EmailIsNotVerified,

    #[error("Email is already verified")]
    EmailIsAlreadyVerified,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Password validation failed: {0}")]
    PasswordPolicy(String),

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------
    #[error("Session is not active")]
    SessionIsNotActive,

    #[error("Session not found")]
    SessionNotFound,

    /// An already rotated refresh token was presented again.
    /// The whole session family has been invalidated by the time this is returned.
    #[error("Refresh token was already used")]
    ReusingOfRefreshToken,

    /// Optimistic concurrency check failed on a session update
    #[error("Session was modified concurrently")]
    SessionConflict,

    // ------------------------------------------------------------------
    // Verification codes
    // ------------------------------------------------------------------
    #[error("Verification code resend cooldown is not over")]
    VerCodeCooldownIsNotOver,

    #[error("Verification code is not correct")]
    VerCodeIsNotCorrect,

    #[error("Verification code is expired")]
    VerCodeIsExpired,

    #[error("No verification code was issued")]
    VerCodeNotIssued,

    // ------------------------------------------------------------------
    // Tokens
    // ------------------------------------------------------------------
    #[error("Token verification failed: {0}")]
    TokenVerificationFailed(String),

    #[error("Wrong token format: {0}")]
    WrongTokenFormat(String),

    // ------------------------------------------------------------------
    // Internal
    // ------------------------------------------------------------------
    /// A token referenced an account that must exist but does not
    #[error("User referenced by a valid token does not exist")]
    UserDoesntExistButHasTo,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserWithEmailDoesntExist => ErrorKind::NotFound,
            AuthError::WrongPassword
            | AuthError::SessionIsNotActive
            | AuthError::SessionNotFound
            | AuthError::ReusingOfRefreshToken
            | AuthError::TokenVerificationFailed(_)
            | AuthError::WrongTokenFormat(_) => ErrorKind::Unauthorized,
            AuthError::EmailIsNotVerified => ErrorKind::Forbidden,
            AuthError::EmailIsAlreadyVerified
            | AuthError::UserAlreadyExists
            | AuthError::SessionConflict => ErrorKind::Conflict,
            AuthError::InvalidEmail(_)
            | AuthError::PasswordPolicy(_)
            | AuthError::VerCodeIsNotCorrect => ErrorKind::BadRequest,
            AuthError::VerCodeCooldownIsNotOver => ErrorKind::TooManyRequests,
            AuthError::VerCodeIsExpired => ErrorKind::Gone,
            AuthError::VerCodeNotIssued => ErrorKind::UnprocessableEntity,
            AuthError::UserDoesntExistButHasTo | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Whether this error signals a consistency bug rather than bad input
    pub fn is_internal(&self) -> bool {
        self.kind().is_server_error()
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            AuthError::ReusingOfRefreshToken
            | AuthError::SessionIsNotActive
            | AuthError::SessionNotFound => err.with_action("Please sign in again"),
            AuthError::EmailIsNotVerified => err.with_action("Please verify your email first"),
            AuthError::VerCodeIsExpired => err.with_action("Please request a new code"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AuthError::UserDoesntExistButHasTo => {
                tracing::error!(error = %self, "Auth consistency violation");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::ReusingOfRefreshToken => {
                tracing::warn!("Refresh token reuse detected");
            }
            AuthError::WrongPassword => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::TokenVerificationFailed(reason) => {
                tracing::warn!(reason = %reason, "Token rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.log();
        err.to_app_error()
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(err: PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<CpuPoolError> for AuthError {
    fn from(err: CpuPoolError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let cases: Vec<(AuthError, u16)> = vec![
            (AuthError::UserWithEmailDoesntExist, 404),
            (AuthError::WrongPassword, 401),
            (AuthError::EmailIsNotVerified, 403),
            (AuthError::EmailIsAlreadyVerified, 409),
            (AuthError::UserAlreadyExists, 409),
            (AuthError::SessionIsNotActive, 401),
            (AuthError::ReusingOfRefreshToken, 401),
            (AuthError::VerCodeCooldownIsNotOver, 429),
            (AuthError::VerCodeIsNotCorrect, 400),
            (AuthError::VerCodeIsExpired, 410),
            (AuthError::TokenVerificationFailed("bad signature".into()), 401),
            (AuthError::WrongTokenFormat("missing sub".into()), 401),
            (AuthError::UserDoesntExistButHasTo, 500),
        ];

        for (error, expected) in cases {
            assert_eq!(error.kind().status_code(), expected, "{error}");
        }
    }

    #[test]
    fn test_internal_classification() {
        assert!(AuthError::UserDoesntExistButHasTo.is_internal());
        assert!(AuthError::Internal("x".into()).is_internal());
        assert!(!AuthError::ReusingOfRefreshToken.is_internal());
        assert!(!AuthError::VerCodeIsExpired.is_internal());
    }

    #[test]
    fn test_to_app_error_adds_action() {
        let app_error: AppError = AuthError::ReusingOfRefreshToken.into();
        assert_eq!(app_error.status_code(), 401);
        assert_eq!(app_error.action(), Some("Please sign in again"));
    }

    #[test]
    fn test_hash_error_is_internal() {
        let err: AuthError = PasswordHashError::InvalidHashFormat.into();
        assert!(err.is_internal());
    }
}
