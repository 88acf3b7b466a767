//! Domain layer - Core entities and value objects of the SSO service.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! users, registered applications and the password hashing value object.

pub mod app;
pub mod constants;
pub mod error;
pub mod password;
pub mod user;

pub use app::App;
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::Password;
pub use user::User;
