//! Sign Up Use Case
//!
//! Creates a new, unverified user account and hands back a registration
//! token for the email verification step.

use std::sync::Arc;

use crate::application::context::AuthContext;
use crate::domain::entity::user_account::UserAccount;
use crate::domain::repository::UserAccountRepository;
use crate::domain::token::RegistrationToken;
use crate::domain::value_object::{
    email::Email,
    user_id::UserId,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub email: String,
    pub password: String,
}

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    pub user_id: UserId,
    pub registration_token: RegistrationToken,
}

/// Sign up use case
pub struct SignUpUseCase<U>
where
    U: UserAccountRepository,
{
    user_repo: Arc<U>,
    ctx: AuthContext,
}

impl<U> SignUpUseCase<U>
where
    U: UserAccountRepository,
{
    pub fn new(user_repo: Arc<U>, ctx: AuthContext) -> Self {
        Self { user_repo, ctx }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let email = Email::new(&input.email)?;

        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::UserAlreadyExists);
        }

        // Validate and hash password
        let raw_password = RawPassword::new(input.password)?;
        let password = UserPassword::hash(&self.ctx.hasher, raw_password).await?;

        let account = UserAccount::new(email, password, self.ctx.clock.now());

        // A concurrent sign-up with the same email fails here with UserAlreadyExists
        self.user_repo.insert(&account).await?;

        let registration_token = self
            .ctx
            .codec
            .issue_registration(&account.user_id.to_string())?;

        tracing::info!(
            user_id = %account.user_id,
            email = %account.email,
            "User signed up"
        );

        Ok(SignUpOutput {
            user_id: account.user_id,
            registration_token,
        })
    }
}
