//! Entity Module

pub mod session;
pub mod user_account;
pub mod verification_code;
