//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod context;
pub mod refresh_session;
pub mod send_verification_email;
pub mod services;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod verify_email;

// Re-exports
pub use config::{AuthConfig, ConfigError};
pub use context::AuthContext;
pub use refresh_session::RefreshSessionUseCase;
pub use send_verification_email::SendVerificationEmailUseCase;
pub use services::{RegistrationService, SessionService};
pub use sign_in::{SignInInput, SignInUseCase, TokenPair};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use verify_email::{VerifyEmailInput, VerifyEmailUseCase};
