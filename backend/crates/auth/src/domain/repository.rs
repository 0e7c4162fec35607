//! Repository Traits
//!
//! Interfaces for data persistence and outbound email. Implementations live
//! in the infrastructure layer.

use crate::domain::entity::{
    session::Session, user_account::UserAccount, verification_code::VerificationCode,
};
use crate::domain::value_object::{email::Email, session_id::SessionId, user_id::UserId};
use crate::error::AuthResult;

/// User account repository trait
#[trait_variant::make(UserAccountRepository: Send)]
pub trait LocalUserAccountRepository {
    /// Check if email is taken
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<UserAccount>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<UserAccount>>;

    /// Insert a new account, `UserAlreadyExists` if the email is taken
    async fn insert(&self, account: &UserAccount) -> AuthResult<()>;

    async fn update(&self, account: &UserAccount) -> AuthResult<()>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    async fn insert(&self, session: &Session) -> AuthResult<()>;

    /// Compare-and-set on `session.version`
    ///
    /// Fails with `SessionConflict` when the stored version differs and
    /// bumps the stored version on success.
    async fn update(&self, session: &Session) -> AuthResult<()>;

    /// Persist a refreshed `predecessor` and insert its `successor` atomically
    ///
    /// The predecessor write is the same compare-and-set as `update`. Fails
    /// with `SessionConflict`, writing nothing, when the predecessor changed
    /// or any session of the family is COMPROMISED.
    async fn rotate(&self, predecessor: &Session, successor: &Session) -> AuthResult<()>;

    /// Find a session owned by `user_id`
    async fn find_by_id(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
    ) -> AuthResult<Option<Session>>;

    /// Find the session whose current refresh token is `refresh_token`
    async fn find_by_refresh_token(&self, refresh_token: &str) -> AuthResult<Option<Session>>;

    /// Mark every session of `session`'s family COMPROMISED
    ///
    /// Returns the number of rows changed.
    async fn invalidate_family(&self, session: &Session) -> AuthResult<u64>;
}

/// Verification code repository trait (one live code per user)
#[trait_variant::make(VerificationCodeRepository: Send)]
pub trait LocalVerificationCodeRepository {
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<VerificationCode>>;

    async fn insert(&self, code: &VerificationCode) -> AuthResult<()>;

    async fn update(&self, code: &VerificationCode) -> AuthResult<()>;
}

/// Outbound email delivery
#[trait_variant::make(EmailDispatcher: Send)]
pub trait LocalEmailDispatcher {
    async fn send_verification_email(
        &self,
        account: &UserAccount,
        code: &VerificationCode,
    ) -> AuthResult<()>;
}
