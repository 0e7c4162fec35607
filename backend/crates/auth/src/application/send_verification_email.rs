//! Send Verification Email Use Case
//!
//! Issues (or re-issues after the cooldown) a verification code for the
//! account named by a registration token and dispatches it by email.

use std::sync::Arc;

use crate::application::context::AuthContext;
use crate::domain::entity::{user_account::UserAccount, verification_code::VerificationCode};
use crate::domain::repository::{
    EmailDispatcher, UserAccountRepository, VerificationCodeRepository,
};
use crate::domain::token::{ExpiryPolicy, RegistrationClaims};
use crate::error::{AuthError, AuthResult};

/// Send verification email use case
pub struct SendVerificationEmailUseCase<U, V, E>
where
    U: UserAccountRepository,
    V: VerificationCodeRepository,
    E: EmailDispatcher,
{
    user_repo: Arc<U>,
    code_repo: Arc<V>,
    dispatcher: Arc<E>,
    ctx: AuthContext,
}

impl<U, V, E> SendVerificationEmailUseCase<U, V, E>
where
    U: UserAccountRepository,
    V: VerificationCodeRepository,
    E: EmailDispatcher,
{
    pub fn new(user_repo: Arc<U>, code_repo: Arc<V>, dispatcher: Arc<E>, ctx: AuthContext) -> Self {
        Self {
            user_repo,
            code_repo,
            dispatcher,
            ctx,
        }
    }

    pub async fn execute(&self, registration_token: &str) -> AuthResult<()> {
        let token = self
            .ctx
            .codec
            .decode::<RegistrationClaims>(registration_token, ExpiryPolicy::Enforce)?;
        let user_id = token.subject_id()?;

        let account = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::UserDoesntExistButHasTo)?;
        account.ensure_email_not_verified()?;

        let code = self.issue_code(&account).await?;

        // Dispatch failures are logged, not returned
        if let Err(e) = self
            .dispatcher
            .send_verification_email(&account, &code)
            .await
        {
            tracing::warn!(
                user_id = %account.user_id,
                error = %e,
                "Verification email dispatch failed"
            );
        }

        tracing::info!(
            user_id = %account.user_id,
            expires_at = %code.expires_at,
            "Verification code issued"
        );
        Ok(())
    }

    /// Create the first code, or replace the live one once the cooldown is over
    async fn issue_code(&self, account: &UserAccount) -> AuthResult<VerificationCode> {
        let config = &self.ctx.config;
        let now = self.ctx.clock.now();

        match self.code_repo.find_by_user_id(&account.user_id).await? {
            Some(mut code) => {
                code.update_for_resend(
                    config.verification_code_resend_cooldown,
                    config.verification_code_ttl,
                    now,
                )?;
                self.code_repo.update(&code).await?;
                Ok(code)
            }
            None => {
                let code = VerificationCode::create(
                    account.user_id,
                    config.verification_code_len,
                    config.verification_code_ttl,
                    now,
                );
                self.code_repo.insert(&code).await?;
                Ok(code)
            }
        }
    }
}
