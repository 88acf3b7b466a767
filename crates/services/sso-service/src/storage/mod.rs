//! Persistence gateway: the storage capabilities the authentication service
//! depends on, and their SeaORM implementation.
//!
//! The service only sees the three capability traits below. Lookups return
//! domain-typed signals (`UserNotFound`, `AppNotFound`, `UserExists`) so the
//! service never has to inspect driver errors.

pub mod entities;
mod sql_storage;

use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;

use domain::{App, User};

#[cfg(test)]
use mockall::automock;

pub use sql_storage::SqlStorage;

/// Storage-level failures.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("user already exists")]
    UserExists,

    #[error("user not found")]
    UserNotFound,

    #[error("app not found")]
    AppNotFound,

    #[error("app already exists")]
    AppExists,

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persists new users.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserSaver: Send + Sync {
    /// Store a user and return the assigned id.
    /// Fails with `UserExists` when the email is taken.
    async fn save_user(&self, email: &str, pass_hash: &[u8]) -> StorageResult<i64>;
}

/// Reads users and their admin grants.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserProvider: Send + Sync {
    /// Find a user by exact email. Fails with `UserNotFound`.
    async fn user(&self, email: &str) -> StorageResult<User>;

    /// Whether the user holds an admin grant. A user without one yields
    /// `false`; an unknown user fails with `UserNotFound`.
    async fn is_admin(&self, user_id: i64) -> StorageResult<bool>;
}

/// Reads registered applications.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AppProvider: Send + Sync {
    /// Find an app by id. Fails with `AppNotFound`.
    async fn app(&self, app_id: i32) -> StorageResult<App>;
}
