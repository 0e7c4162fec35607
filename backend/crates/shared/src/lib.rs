//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - Transport-neutral error model ([`error::app_error::AppError`], [`error::kind::ErrorKind`])
//! - Typed identifiers ([`id::Id`])
//!
//! Only things with a consistent meaning across every crate of the
//! workspace belong here.

pub mod error {
    pub mod app_error;
    pub mod kind;
}
pub mod id;
