//! In-Memory Repository Implementations
//!
//! Non-durable store implementing every repository trait. Reads hand out
//! clones, so callers never alias stored state. Session updates are a
//! compare-and-set on `version` under the table's write lock, and a refresh
//! rotation writes both sessions under a single acquisition of it.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::domain::entity::{
    session::Session, user_account::UserAccount, verification_code::VerificationCode,
};
use crate::domain::repository::{
    SessionRepository, UserAccountRepository, VerificationCodeRepository,
};
use crate::domain::value_object::{
    email::Email, session_id::SessionId, session_status::SessionStatus, user_id::UserId,
};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Default)]
struct SessionTable {
    rows: HashMap<SessionId, Session>,
    by_refresh_token: HashMap<String, SessionId>,
}

impl SessionTable {
    fn check_insertable(&self, session: &Session) -> AuthResult<()> {
        if self.rows.contains_key(&session.session_id)
            || self.by_refresh_token.contains_key(&session.refresh_token)
        {
            return Err(AuthError::Internal(format!(
                "duplicate session {}",
                session.session_id
            )));
        }
        Ok(())
    }

    fn insert_row(&mut self, session: &Session) {
        self.by_refresh_token
            .insert(session.refresh_token.clone(), session.session_id);
        self.rows.insert(session.session_id, session.clone());
    }

    fn compare_and_set(&mut self, session: &Session) -> AuthResult<()> {
        let stored = self
            .rows
            .get_mut(&session.session_id)
            .ok_or(AuthError::SessionNotFound)?;

        if stored.version != session.version {
            return Err(AuthError::SessionConflict);
        }

        let mut next = session.clone();
        next.version += 1;
        *stored = next;
        Ok(())
    }

    fn family_is_compromised(&self, session: &Session) -> bool {
        self.rows.values().any(|s| {
            s.family_id == session.family_id && s.status == SessionStatus::Compromised
        })
    }
}

/// In-memory auth store
#[derive(Debug, Default)]
pub struct InMemoryAuthStore {
    users: RwLock<HashMap<UserId, UserAccount>>,
    sessions: RwLock<SessionTable>,
    codes: RwLock<HashMap<UserId, VerificationCode>>,
}

impl InMemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every session of a family, oldest first
    pub async fn family_sessions(&self, session: &Session) -> Vec<Session> {
        let table = self.sessions.read().await;
        let mut family: Vec<Session> = table
            .rows
            .values()
            .filter(|s| s.family_id == session.family_id)
            .cloned()
            .collect();
        family.sort_by_key(|s| s.created_at);
        family
    }
}

// ============================================================================
// User Account Repository Implementation
// ============================================================================

impl UserAccountRepository for InMemoryAuthStore {
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.email == *email))
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<UserAccount>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<UserAccount>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == *email).cloned())
    }

    async fn insert(&self, account: &UserAccount) -> AuthResult<()> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.email == account.email || u.user_id == account.user_id)
        {
            return Err(AuthError::UserAlreadyExists);
        }
        users.insert(account.user_id, account.clone());
        Ok(())
    }

    async fn update(&self, account: &UserAccount) -> AuthResult<()> {
        let mut users = self.users.write().await;
        match users.get_mut(&account.user_id) {
            Some(stored) => {
                *stored = account.clone();
                Ok(())
            }
            None => Err(AuthError::Internal(format!(
                "update of unknown user {}",
                account.user_id
            ))),
        }
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for InMemoryAuthStore {
    async fn insert(&self, session: &Session) -> AuthResult<()> {
        let mut table = self.sessions.write().await;
        table.check_insertable(session)?;
        table.insert_row(session);
        Ok(())
    }

    async fn update(&self, session: &Session) -> AuthResult<()> {
        let mut table = self.sessions.write().await;
        table.compare_and_set(session)
    }

    async fn rotate(&self, predecessor: &Session, successor: &Session) -> AuthResult<()> {
        let mut table = self.sessions.write().await;
        if table.family_is_compromised(predecessor) {
            return Err(AuthError::SessionConflict);
        }
        table.check_insertable(successor)?;
        table.compare_and_set(predecessor)?;
        table.insert_row(successor);
        Ok(())
    }

    async fn find_by_id(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
    ) -> AuthResult<Option<Session>> {
        let table = self.sessions.read().await;
        Ok(table
            .rows
            .get(session_id)
            .filter(|s| s.user_id == *user_id)
            .cloned())
    }

    async fn find_by_refresh_token(&self, refresh_token: &str) -> AuthResult<Option<Session>> {
        let table = self.sessions.read().await;
        Ok(table
            .by_refresh_token
            .get(refresh_token)
            .and_then(|id| table.rows.get(id))
            .cloned())
    }

    async fn invalidate_family(&self, session: &Session) -> AuthResult<u64> {
        let mut table = self.sessions.write().await;
        let mut invalidated = 0;
        for stored in table
            .rows
            .values_mut()
            .filter(|s| s.family_id == session.family_id)
        {
            stored.compromise();
            stored.version += 1;
            invalidated += 1;
        }
        Ok(invalidated)
    }
}

// ============================================================================
// Verification Code Repository Implementation
// ============================================================================

impl VerificationCodeRepository for InMemoryAuthStore {
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<VerificationCode>> {
        Ok(self.codes.read().await.get(user_id).cloned())
    }

    async fn insert(&self, code: &VerificationCode) -> AuthResult<()> {
        let mut codes = self.codes.write().await;
        if codes.contains_key(&code.user_id) {
            return Err(AuthError::Internal(format!(
                "verification code already issued for user {}",
                code.user_id
            )));
        }
        codes.insert(code.user_id, code.clone());
        Ok(())
    }

    async fn update(&self, code: &VerificationCode) -> AuthResult<()> {
        let mut codes = self.codes.write().await;
        match codes.get_mut(&code.user_id) {
            Some(stored) => {
                *stored = code.clone();
                Ok(())
            }
            None => Err(AuthError::Internal(format!(
                "update of unknown verification code for user {}",
                code.user_id
            ))),
        }
    }
}
