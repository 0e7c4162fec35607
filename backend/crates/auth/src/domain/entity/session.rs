//! Session Entity
//!
//! One login's lifecycle and one link of its refresh-rotation chain.
//! Transitions are listed on [`SessionStatus`].

use chrono::{DateTime, Duration, Utc};

use crate::domain::token::RefreshToken;
use crate::domain::value_object::{
    session_id::{FamilyId, SessionId},
    session_status::SessionStatus,
    user_id::UserId,
};
use crate::error::{AuthError, AuthResult};

/// Session entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: SessionId,
    pub user_id: UserId,
    /// Shared by every session rotated out of the same sign-in
    pub family_id: FamilyId,
    /// Encoding of the current refresh token (unique lookup key)
    pub refresh_token: String,
    /// Session expiration, independent of the token's own `exp`
    pub expires_at: DateTime<Utc>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    /// Optimistic-concurrency counter, owned by storage
    pub version: u64,
}

impl Session {
    /// Start a new family with an ACTIVE session
    pub fn create(
        user_id: UserId,
        refresh_token: &RefreshToken,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self::active(user_id, FamilyId::new(), refresh_token, ttl, now)
    }

    /// Successor of a rotated session, inheriting its family
    pub fn create_from_refreshed(
        predecessor: &Session,
        refresh_token: &RefreshToken,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> AuthResult<Self> {
        if predecessor.status != SessionStatus::Refreshed {
            return Err(AuthError::Internal(format!(
                "successor requested for session {} in state {}",
                predecessor.session_id, predecessor.status
            )));
        }

        Ok(Self::active(
            predecessor.user_id,
            predecessor.family_id,
            refresh_token,
            ttl,
            now,
        ))
    }

    fn active(
        user_id: UserId,
        family_id: FamilyId,
        refresh_token: &RefreshToken,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: SessionId::new(),
            user_id,
            family_id,
            refresh_token: refresh_token.encoded().to_string(),
            expires_at: now + ttl,
            status: SessionStatus::Active,
            created_at: now,
            version: 0,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    fn ensure_active(&self, now: DateTime<Utc>) -> AuthResult<()> {
        if self.status != SessionStatus::Active || self.is_expired(now) {
            return Err(AuthError::SessionIsNotActive);
        }
        Ok(())
    }

    /// End the session at the user's request
    pub fn logout(&mut self, now: DateTime<Utc>) -> AuthResult<()> {
        self.ensure_active(now)?;
        self.status = SessionStatus::Logout;
        Ok(())
    }

    /// Consume this session's refresh token
    ///
    /// A REFRESHED session seeing its token again means the token leaked.
    pub fn refresh(&mut self, now: DateTime<Utc>) -> AuthResult<()> {
        if self.status == SessionStatus::Refreshed {
            return Err(AuthError::ReusingOfRefreshToken);
        }
        self.ensure_active(now)?;
        self.status = SessionStatus::Refreshed;
        Ok(())
    }

    pub fn compromise(&mut self) {
        self.status = SessionStatus::Compromised;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::token::{RefreshClaims, Token, TokenKind};

    fn refresh_token(user_id: UserId, now: DateTime<Utc>) -> RefreshToken {
        let claims = RefreshClaims {
            jti: uuid::Uuid::new_v4().to_string(),
            token_kind: TokenKind::Refresh,
            sub: user_id.to_string(),
            exp: (now + Duration::hours(24)).timestamp(),
        };
        Token::from_parts(claims, format!("encoded.{}", uuid::Uuid::new_v4()))
    }

    fn session(now: DateTime<Utc>) -> Session {
        let user_id = UserId::new();
        Session::create(user_id, &refresh_token(user_id, now), Duration::hours(24), now)
    }

    #[test]
    fn test_create_is_active() {
        let now = Utc::now();
        let session = session(now);
        assert_eq!(session.status, SessionStatus::Active);
        assert_eq!(session.expires_at, now + Duration::hours(24));
        assert!(session.refresh_token.starts_with("encoded."));
    }

    #[test]
    fn test_logout_only_from_active() {
        let now = Utc::now();
        let mut session = session(now);
        session.logout(now).unwrap();
        assert_eq!(session.status, SessionStatus::Logout);

        assert!(matches!(
            session.logout(now),
            Err(AuthError::SessionIsNotActive)
        ));
        assert!(matches!(
            session.refresh(now),
            Err(AuthError::SessionIsNotActive)
        ));
    }

    #[test]
    fn test_expired_session_cannot_logout_or_refresh() {
        let now = Utc::now();
        let mut session = session(now);
        let later = now + Duration::hours(25);

        assert!(matches!(
            session.logout(later),
            Err(AuthError::SessionIsNotActive)
        ));
        assert!(matches!(
            session.refresh(later),
            Err(AuthError::SessionIsNotActive)
        ));
        assert_eq!(session.status, SessionStatus::Active);
    }

    #[test]
    fn test_refresh_twice_is_reuse() {
        let now = Utc::now();
        let mut session = session(now);
        session.refresh(now).unwrap();
        assert_eq!(session.status, SessionStatus::Refreshed);

        assert!(matches!(
            session.refresh(now),
            Err(AuthError::ReusingOfRefreshToken)
        ));
    }

    #[test]
    fn test_successor_inherits_family() {
        let now = Utc::now();
        let mut predecessor = session(now);
        predecessor.refresh(now).unwrap();

        let token = refresh_token(predecessor.user_id, now);
        let successor =
            Session::create_from_refreshed(&predecessor, &token, Duration::hours(24), now).unwrap();

        assert_eq!(successor.family_id, predecessor.family_id);
        assert_eq!(successor.user_id, predecessor.user_id);
        assert_ne!(successor.session_id, predecessor.session_id);
        assert_eq!(successor.status, SessionStatus::Active);
        assert_eq!(successor.refresh_token, token.encoded());
    }

    #[test]
    fn test_successor_requires_refreshed_predecessor() {
        let now = Utc::now();
        let predecessor = session(now);
        let token = refresh_token(predecessor.user_id, now);

        let err = Session::create_from_refreshed(&predecessor, &token, Duration::hours(24), now)
            .unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_compromised_is_terminal() {
        let now = Utc::now();
        let mut session = session(now);
        session.compromise();
        assert!(session.status.is_terminal());
        assert!(matches!(
            session.refresh(now),
            Err(AuthError::SessionIsNotActive)
        ));
    }
}
