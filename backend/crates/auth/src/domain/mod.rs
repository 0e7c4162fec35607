//! Domain Layer
//!
//! Contains entities, value objects, tokens, and repository traits.

pub mod entity;
pub mod repository;
pub mod token;
pub mod value_object;

// Re-exports
pub use entity::{session::Session, user_account::UserAccount, verification_code::VerificationCode};
pub use repository::{
    EmailDispatcher, SessionRepository, UserAccountRepository, VerificationCodeRepository,
};
