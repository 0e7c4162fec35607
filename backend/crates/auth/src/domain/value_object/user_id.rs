use kernel::id::Id;

use crate::error::{AuthError, AuthResult};

pub struct UserMarker;
pub type UserId = Id<UserMarker>;

/// Parse a token subject into a user id
pub fn user_id_from_subject(subject: &str) -> AuthResult<UserId> {
    UserId::parse_str(subject)
        .map_err(|_| AuthError::WrongTokenFormat(format!("subject is not a user id: {subject}")))
}
