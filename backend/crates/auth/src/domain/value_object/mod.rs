//! Value Object Module

pub mod email;
pub mod session_id;
pub mod session_status;
pub mod user_id;
pub mod user_password;
