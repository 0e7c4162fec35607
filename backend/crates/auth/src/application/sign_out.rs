//! Sign Out Use Case
//!
//! Ends a session on behalf of the holder of a live access token.

use std::sync::Arc;

use crate::application::context::AuthContext;
use crate::domain::repository::SessionRepository;
use crate::domain::token::{AccessClaims, ExpiryPolicy};
use crate::domain::value_object::session_id::SessionId;
use crate::error::{AuthError, AuthResult};

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    ctx: AuthContext,
}

impl<S> SignOutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, ctx: AuthContext) -> Self {
        Self { session_repo, ctx }
    }

    pub async fn execute(&self, access_token: &str, session_id: &SessionId) -> AuthResult<()> {
        let token = self
            .ctx
            .codec
            .decode::<AccessClaims>(access_token, ExpiryPolicy::Enforce)?;
        let user_id = token.subject_id()?;

        // Scoped to the token's subject: other users' sessions are not found
        let mut session = self
            .session_repo
            .find_by_id(session_id, &user_id)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        session.logout(self.ctx.clock.now())?;

        match self.session_repo.update(&session).await {
            Err(AuthError::SessionConflict) => return Err(AuthError::SessionIsNotActive),
            result => result?,
        }

        tracing::info!(
            user_id = %user_id,
            session_id = %session.session_id,
            "User signed out"
        );
        Ok(())
    }
}
