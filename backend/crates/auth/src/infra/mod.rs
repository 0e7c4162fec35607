//! Infrastructure Layer
//!
//! Storage and external service integrations.

pub mod email;
pub mod memory;

pub use email::LoggingEmailDispatcher;
pub use memory::InMemoryAuthStore;
