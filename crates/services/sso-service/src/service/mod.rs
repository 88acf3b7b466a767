//! Authentication service business logic.

mod auth_service;
pub mod token;

pub use auth_service::{AuthService, Authenticator};

#[cfg(test)]
pub use auth_service::MockAuthService;
