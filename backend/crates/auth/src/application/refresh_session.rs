//! Refresh Session Use Case
//!
//! Rotates a refresh token: the presented session becomes REFRESHED and a
//! successor in the same family takes over. Presenting an already rotated
//! token burns the whole family.

use std::sync::Arc;

use crate::application::context::AuthContext;
use crate::application::sign_in::{TokenPair, issue_token_pair};
use crate::domain::entity::session::Session;
use crate::domain::repository::{SessionRepository, UserAccountRepository};
use crate::domain::token::{ExpiryPolicy, RefreshClaims};
use crate::error::{AuthError, AuthResult};

/// Refresh session use case
pub struct RefreshSessionUseCase<U, S>
where
    U: UserAccountRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    ctx: AuthContext,
}

impl<U, S> RefreshSessionUseCase<U, S>
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

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        // The session row, not the token's exp, bounds a refresh token's life
        let token = self
            .ctx
            .codec
            .decode::<RefreshClaims>(refresh_token, ExpiryPolicy::Skip)?;

        let mut session = self
            .session_repo
            .find_by_refresh_token(token.encoded())
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        let now = self.ctx.clock.now();
        if let Err(err) = session.refresh(now) {
            if matches!(err, AuthError::ReusingOfRefreshToken) {
                self.invalidate_family(&session).await?;
            }
            return Err(err);
        }

        let account = self
            .user_repo
            .find_by_id(&session.user_id)
            .await?
            .ok_or(AuthError::UserDoesntExistButHasTo)?;

        let (access_token, refresh_token) = issue_token_pair(&self.ctx.codec, &account)?;
        let successor = Session::create_from_refreshed(
            &session,
            &refresh_token,
            self.ctx.config.session_ttl,
            now,
        )?;

        // Losing the race to a concurrent refresh, logout or family invalidation
        match self.session_repo.rotate(&session, &successor).await {
            Err(AuthError::SessionConflict) => return Err(AuthError::SessionIsNotActive),
            result => result?,
        }

        tracing::info!(
            user_id = %account.user_id,
            family_id = %session.family_id,
            from_session_id = %session.session_id,
            to_session_id = %successor.session_id,
            "Session refreshed"
        );

        Ok(TokenPair {
            access_token,
            refresh_token,
            session_id: successor.session_id,
        })
    }

    async fn invalidate_family(&self, session: &Session) -> AuthResult<()> {
        let invalidated = self.session_repo.invalidate_family(session).await?;
        tracing::warn!(
            user_id = %session.user_id,
            family_id = %session.family_id,
            session_id = %session.session_id,
            invalidated,
            "Refresh token reuse detected, session family invalidated"
        );
        Ok(())
    }
}
