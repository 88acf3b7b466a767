//! Common utilities shared by the SSO service crates.
//!
//! This crate provides:
//! - The caller-facing authentication error taxonomy and its gRPC mapping
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AuthError, AuthResult, BoxError};
