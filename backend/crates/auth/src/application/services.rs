//! Application Services
//!
//! Entry points grouping the use cases by flow:
//! - [`SessionService`]: login, refresh, logout
//! - [`RegistrationService`]: register, send verification email, verify email

use std::sync::Arc;

use crate::application::context::AuthContext;
use crate::application::refresh_session::RefreshSessionUseCase;
use crate::application::send_verification_email::SendVerificationEmailUseCase;
use crate::application::sign_in::{SignInInput, SignInUseCase, TokenPair};
use crate::application::sign_out::SignOutUseCase;
use crate::application::sign_up::{SignUpInput, SignUpUseCase};
use crate::application::verify_email::{VerifyEmailInput, VerifyEmailUseCase};
use crate::domain::repository::{
    EmailDispatcher, SessionRepository, UserAccountRepository, VerificationCodeRepository,
};
use crate::domain::token::RegistrationToken;
use crate::domain::value_object::session_id::SessionId;
use crate::error::AuthResult;

/// Login, refresh-token rotation and logout
pub struct SessionService<U, S>
where
    U: UserAccountRepository,
    S: SessionRepository,
{
    sign_in: SignInUseCase<U, S>,
    refresh: RefreshSessionUseCase<U, S>,
    sign_out: SignOutUseCase<S>,
}

impl<U, S> SessionService<U, S>
where
    U: UserAccountRepository,
    S: SessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, ctx: AuthContext) -> Self {
        Self {
            sign_in: SignInUseCase::new(
                Arc::clone(&user_repo),
                Arc::clone(&session_repo),
                ctx.clone(),
            ),
            refresh: RefreshSessionUseCase::new(user_repo, Arc::clone(&session_repo), ctx.clone()),
            sign_out: SignOutUseCase::new(session_repo, ctx),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthResult<TokenPair> {
        self.sign_in
            .execute(SignInInput {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
    }

    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        self.refresh.execute(refresh_token).await
    }

    pub async fn logout(&self, access_token: &str, session_id: &SessionId) -> AuthResult<()> {
        self.sign_out.execute(access_token, session_id).await
    }
}

/// Account registration and email verification
pub struct RegistrationService<U, V, E>
where
    U: UserAccountRepository,
    V: VerificationCodeRepository,
    E: EmailDispatcher,
{
    sign_up: SignUpUseCase<U>,
    send_code: SendVerificationEmailUseCase<U, V, E>,
    verify: VerifyEmailUseCase<U, V>,
}

impl<U, V, E> RegistrationService<U, V, E>
where
    U: UserAccountRepository,
    V: VerificationCodeRepository,
    E: EmailDispatcher,
{
    pub fn new(user_repo: Arc<U>, code_repo: Arc<V>, dispatcher: Arc<E>, ctx: AuthContext) -> Self {
        Self {
            sign_up: SignUpUseCase::new(Arc::clone(&user_repo), ctx.clone()),
            send_code: SendVerificationEmailUseCase::new(
                Arc::clone(&user_repo),
                Arc::clone(&code_repo),
                dispatcher,
                ctx.clone(),
            ),
            verify: VerifyEmailUseCase::new(user_repo, code_repo, ctx),
        }
    }

    /// Create an account and return its registration token
    pub async fn register(&self, email: &str, password: &str) -> AuthResult<RegistrationToken> {
        let output = self
            .sign_up
            .execute(SignUpInput {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        Ok(output.registration_token)
    }

    pub async fn send_verification_email(&self, registration_token: &str) -> AuthResult<()> {
        self.send_code.execute(registration_token).await
    }

    pub async fn verify_email(&self, registration_token: &str, code: &str) -> AuthResult<()> {
        self.verify
            .execute(VerifyEmailInput {
                registration_token: registration_token.to_string(),
                code: code.to_string(),
            })
            .await
    }
}
