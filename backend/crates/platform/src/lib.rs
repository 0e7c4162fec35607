//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (bcrypt, bounded input length)
//! - Bounded CPU pool for blocking work
//! - Clock abstraction (wall clock and manual clock for tests)
//! - Cryptographic helpers (random codes, constant-time comparison, Base64)

pub mod blocking;
pub mod clock;
pub mod crypto;
pub mod password;
