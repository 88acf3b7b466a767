//! Shared setup for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use common::DatabaseConfig;
use sea_orm::{ActiveModelTrait, Set};
use sso_service_lib::service::Authenticator;
use sso_service_lib::storage::entities::app;
use sso_service_lib::storage::SqlStorage;

pub const APP_SECRET: &[u8] = b"integration-test-secret-32-bytes!";

pub const TOKEN_TTL: Duration = Duration::from_secs(3600);

/// Fresh in-memory SQLite database with the schema in place.
/// A single connection keeps every query on the same in-memory database.
pub async fn memory_storage() -> Arc<SqlStorage> {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };

    Arc::new(SqlStorage::connect(&config).await.unwrap())
}

pub fn authenticator(storage: &Arc<SqlStorage>) -> Authenticator {
    Authenticator::new(storage.clone(), storage.clone(), storage.clone(), TOKEN_TTL)
}

/// Provision an app with a fixed id.
pub async fn insert_app(storage: &SqlStorage, id: i32, name: &str) {
    app::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        secret: Set(APP_SECRET.to_vec()),
    }
    .insert(storage.connection())
    .await
    .unwrap();
}
