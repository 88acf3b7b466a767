//! SSO Service Library
//!
//! Single-sign-on credential service: registers users, authenticates them by
//! email and password, issues session tokens signed per calling application
//! and answers admin-privilege queries.
//!
//! The authentication core lives in [`service`]; [`storage`] is the
//! persistence gateway it depends on and `grpc` (feature `grpc`) is the
//! transport adapter.

pub mod config;
#[cfg(feature = "grpc")]
pub mod grpc;
pub mod service;
pub mod storage;

use std::sync::Arc;

use tracing::info;

use crate::config::SsoServiceConfig;
use crate::service::Authenticator;
use crate::storage::SqlStorage;

/// Build the authentication service on top of a storage backend.
pub fn build_authenticator(storage: Arc<SqlStorage>, config: &SsoServiceConfig) -> Authenticator {
    Authenticator::new(
        storage.clone(),
        storage.clone(),
        storage,
        config.token.ttl(),
    )
}

/// Run the gRPC server with the given configuration.
#[cfg(feature = "grpc")]
pub async fn run_server(config: SsoServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use tonic::transport::Server;

    use crate::grpc::{AuthGrpcService, AuthServer};

    let storage = Arc::new(SqlStorage::connect(&config.database).await?);
    let auth_service = Arc::new(build_authenticator(storage, &config));
    let grpc_service = AuthGrpcService::new(auth_service);

    let addr: SocketAddr = config.grpc.addr().parse()?;
    info!("SSO service listening on {}", addr);

    Server::builder()
        .timeout(config.grpc.timeout())
        .add_service(AuthServer::new(grpc_service))
        .serve_with_shutdown(addr, shutdown_signal())
        .await?;

    info!("SSO service stopped");
    Ok(())
}

#[cfg(feature = "grpc")]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Register a new application with its token signing secret.
pub async fn create_app(
    config: &SsoServiceConfig,
    name: &str,
    secret: &str,
) -> Result<i32, Box<dyn std::error::Error>> {
    if secret.len() < domain::MIN_APP_SECRET_LENGTH {
        return Err(format!(
            "App secret must be at least {} characters long",
            domain::MIN_APP_SECRET_LENGTH
        )
        .into());
    }

    let storage = SqlStorage::connect(&config.database).await?;
    let app_id = storage.save_app(name, secret.as_bytes()).await?;
    info!(app_id, name, "App created");

    Ok(app_id)
}

/// Grant admin rights to an existing user.
pub async fn grant_admin(
    config: &SsoServiceConfig,
    user_id: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let storage = SqlStorage::connect(&config.database).await?;
    storage.grant_admin(user_id).await?;
    info!(user_id, "Admin granted");

    Ok(())
}
