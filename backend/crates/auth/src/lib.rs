//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, signed tokens, repository traits
//! - `application/` - Use cases, services and configuration
//! - `infra/` - In-memory store and logging email dispatcher
//!
//! ## Features
//! - Email/password registration with emailed verification codes
//! - Sign-in issuing a short-lived access token and a refresh token
//! - Refresh-token rotation; replaying a rotated token invalidates every
//!   session descended from the same sign-in
//! - Sign-out of a single session
//!
//! ## Security Model
//! - Passwords hashed with bcrypt on a bounded CPU pool; inputs over
//!   72 bytes are rejected, never truncated
//! - Tokens are HMAC-signed JWTs with strict, per-kind claim schemas
//! - Session updates are compare-and-set, so one refresh token rotates once

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;


// Re-exports for convenience
pub use application::config::{AuthConfig, ConfigError};
pub use application::context::AuthContext;
pub use application::services::{RegistrationService, SessionService};
pub use application::sign_in::TokenPair;
pub use error::{AuthError, AuthResult};
pub use infra::{email::LoggingEmailDispatcher, memory::InMemoryAuthStore};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::token::*;
    pub use crate::domain::value_object::*;
}
