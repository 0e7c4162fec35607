//! Verify Email Use Case

use std::sync::Arc;

use crate::application::context::AuthContext;
use crate::domain::repository::{UserAccountRepository, VerificationCodeRepository};
use crate::domain::token::{ExpiryPolicy, RegistrationClaims};
use crate::error::{AuthError, AuthResult};

/// Verify email input
pub struct VerifyEmailInput {
    pub registration_token: String,
    pub code: String,
}

/// Verify email use case
pub struct VerifyEmailUseCase<U, V>
where
    U: UserAccountRepository,
    V: VerificationCodeRepository,
{
    user_repo: Arc<U>,
    code_repo: Arc<V>,
    ctx: AuthContext,
}

impl<U, V> VerifyEmailUseCase<U, V>
where
    U: UserAccountRepository,
    V: VerificationCodeRepository,
{
    pub fn new(user_repo: Arc<U>, code_repo: Arc<V>, ctx: AuthContext) -> Self {
        Self {
            user_repo,
            code_repo,
            ctx,
        }
    }

    pub async fn execute(&self, input: VerifyEmailInput) -> AuthResult<()> {
        let token = self
            .ctx
            .codec
            .decode::<RegistrationClaims>(&input.registration_token, ExpiryPolicy::Enforce)?;
        let user_id = token.subject_id()?;

        let mut account = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::UserDoesntExistButHasTo)?;
        account.ensure_email_not_verified()?;

        let code = self
            .code_repo
            .find_by_user_id(&user_id)
            .await?
            .ok_or(AuthError::VerCodeNotIssued)?;

        let now = self.ctx.clock.now();
        code.check_code(&input.code, now)?;

        account.verify_email(now)?;
        self.user_repo.update(&account).await?;

        tracing::info!(user_id = %account.user_id, "Email verified");
        Ok(())
    }
}
