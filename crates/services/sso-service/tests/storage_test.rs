//! Persistence gateway tests on in-memory SQLite.

mod support;

use domain::Password;
use sea_orm::{ActiveModelTrait, Set};
use sso_service_lib::storage::entities::admin;
use sso_service_lib::storage::{AppProvider, StorageError, UserProvider, UserSaver};

use support::{insert_app, memory_storage, APP_SECRET};

#[tokio::test]
async fn test_save_and_find_user() {
    let storage = memory_storage().await;
    let hash = Password::new("pw1").unwrap().into_bytes();

    let id = storage.save_user("a@x.com", &hash).await.unwrap();
    let user = storage.user("a@x.com").await.unwrap();

    assert_eq!(user.id, id);
    assert_eq!(user.email, "a@x.com");
    assert_eq!(user.pass_hash, hash);
}

#[tokio::test]
async fn test_ids_are_assigned_by_storage() {
    let storage = memory_storage().await;

    let first = storage.save_user("a@x.com", b"h1").await.unwrap();
    let second = storage.save_user("b@x.com", b"h2").await.unwrap();

    assert!(first > 0);
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_duplicate_email_is_user_exists() {
    let storage = memory_storage().await;
    storage.save_user("a@x.com", b"h1").await.unwrap();

    let result = storage.save_user("a@x.com", b"h2").await;
    assert!(matches!(result, Err(StorageError::UserExists)));
}

#[tokio::test]
async fn test_email_lookup_is_case_sensitive() {
    let storage = memory_storage().await;
    storage.save_user("a@x.com", b"h1").await.unwrap();

    let result = storage.user("A@X.com").await;
    assert!(matches!(result, Err(StorageError::UserNotFound)));
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let storage = memory_storage().await;

    assert!(matches!(
        storage.user("nobody@x.com").await,
        Err(StorageError::UserNotFound)
    ));
    assert!(matches!(
        storage.is_admin(12).await,
        Err(StorageError::UserNotFound)
    ));
}

#[tokio::test]
async fn test_admin_grant() {
    let storage = memory_storage().await;
    let id = storage.save_user("a@x.com", b"h1").await.unwrap();

    assert!(!storage.is_admin(id).await.unwrap());

    storage.grant_admin(id).await.unwrap();
    storage.grant_admin(id).await.unwrap();

    assert!(storage.is_admin(id).await.unwrap());
}

#[tokio::test]
async fn test_grant_admin_over_existing_row() {
    let storage = memory_storage().await;
    let id = storage.save_user("a@x.com", b"h1").await.unwrap();

    // Row written by another writer between our user check and insert
    admin::ActiveModel { user_id: Set(id) }
        .insert(storage.connection())
        .await
        .unwrap();

    storage.grant_admin(id).await.unwrap();
    assert!(storage.is_admin(id).await.unwrap());
}

#[tokio::test]
async fn test_concurrent_grants_both_succeed() {
    let storage = memory_storage().await;
    let id = storage.save_user("a@x.com", b"h1").await.unwrap();

    let (first, second) = tokio::join!(storage.grant_admin(id), storage.grant_admin(id));

    assert!(first.is_ok());
    assert!(second.is_ok());
    assert!(storage.is_admin(id).await.unwrap());
}

#[tokio::test]
async fn test_grant_admin_to_unknown_user() {
    let storage = memory_storage().await;

    let result = storage.grant_admin(404).await;
    assert!(matches!(result, Err(StorageError::UserNotFound)));
}

#[tokio::test]
async fn test_apps() {
    let storage = memory_storage().await;
    insert_app(&storage, 42, "fixed-id-app").await;

    let app = storage.app(42).await.unwrap();
    assert_eq!(app.name, "fixed-id-app");
    assert_eq!(app.secret, APP_SECRET);

    assert!(matches!(
        storage.app(999).await,
        Err(StorageError::AppNotFound)
    ));
}

#[tokio::test]
async fn test_save_app() {
    let storage = memory_storage().await;

    let id = storage.save_app("mobile", APP_SECRET).await.unwrap();
    assert_eq!(storage.app(id).await.unwrap().name, "mobile");

    let duplicate = storage.save_app("mobile", b"other").await;
    assert!(matches!(duplicate, Err(StorageError::AppExists)));
}

#[tokio::test]
async fn test_ensure_schema_is_idempotent() {
    let storage = memory_storage().await;
    storage.save_user("a@x.com", b"h1").await.unwrap();

    storage.ensure_schema().await.unwrap();

    assert!(storage.user("a@x.com").await.is_ok());
}
