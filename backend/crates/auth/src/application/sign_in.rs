//! Sign In Use Case
//!
//! Authenticates a user and starts a new session family.

use std::sync::Arc;

use crate::application::context::AuthContext;
use crate::domain::entity::{session::Session, user_account::UserAccount};
use crate::domain::repository::{SessionRepository, UserAccountRepository};
use crate::domain::token::{AccessToken, AccessTokenData, RefreshToken, TokenCodec};
use crate::domain::value_object::{email::Email, session_id::SessionId};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Tokens handed to the client after sign-in or refresh
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    /// Session the refresh token is bound to (needed to sign out)
    pub session_id: SessionId,
}

/// Mint an access/refresh pair for `account`
pub(crate) fn issue_token_pair(
    codec: &TokenCodec,
    account: &UserAccount,
) -> AuthResult<(AccessToken, RefreshToken)> {
    let subject = account.user_id.to_string();
    let access_token = codec.issue_access(
        &subject,
        AccessTokenData {
            is_admin: account.is_admin,
        },
    )?;
    let refresh_token = codec.issue_refresh(&subject)?;
    Ok((access_token, refresh_token))
}

/// Sign in use case
pub struct SignInUseCase<U, S>
where
    U: UserAccountRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    ctx: AuthContext,
}

impl<U, S> SignInUseCase<U, S>
where
    U: UserAccountRepository,
    S: SessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, ctx: AuthContext) -> Self {
        Self {
            user_repo,
            session_repo,
            ctx,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<TokenPair> {
        // A malformed email cannot belong to any account
        let email = Email::new(&input.email).map_err(|_| AuthError::UserWithEmailDoesntExist)?;

        let account = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserWithEmailDoesntExist)?;

        // Password first, verification status second
        account
            .password
            .check(&self.ctx.hasher, input.password)
            .await?;
        account.ensure_email_verified()?;

        let (access_token, refresh_token) = issue_token_pair(&self.ctx.codec, &account)?;
        let session = Session::create(
            account.user_id,
            &refresh_token,
            self.ctx.config.session_ttl,
            self.ctx.clock.now(),
        );
        self.session_repo.insert(&session).await?;

        tracing::info!(
            user_id = %account.user_id,
            session_id = %session.session_id,
            family_id = %session.family_id,
            "User signed in"
        );

        Ok(TokenPair {
            access_token,
            refresh_token,
            session_id: session.session_id,
        })
    }
}
