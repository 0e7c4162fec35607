//! Email Dispatcher Implementations

use crate::domain::entity::{user_account::UserAccount, verification_code::VerificationCode};
use crate::domain::repository::EmailDispatcher;
use crate::error::AuthResult;

/// Dispatcher that records each email through `tracing` instead of sending it
///
/// The code itself is only emitted at `debug` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEmailDispatcher;

impl EmailDispatcher for LoggingEmailDispatcher {
    async fn send_verification_email(
        &self,
        account: &UserAccount,
        code: &VerificationCode,
    ) -> AuthResult<()> {
        tracing::info!(
            user_id = %account.user_id,
            email = %account.email,
            expires_at = %code.expires_at,
            "Verification email dispatched"
        );
        tracing::debug!(user_id = %account.user_id, code = %code.code, "Verification code");
        Ok(())
    }
}
