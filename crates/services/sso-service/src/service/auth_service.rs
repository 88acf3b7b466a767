//! Authentication service - login, registration and admin checks.
//!
//! Every storage, hashing or signing failure is classified into an
//! [`AuthError`] before it leaves this module.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task;
use tracing::{error, info, instrument, warn};

use common::{AuthError, AuthResult};
use domain::Password;

use super::token;
use crate::storage::{AppProvider, StorageError, UserProvider, UserSaver};

#[cfg(test)]
use mockall::automock;

/// Authentication service trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify credentials and return a session token for `app_id`
    async fn login(&self, email: String, password: String, app_id: i32) -> AuthResult<String>;

    /// Register a new user and return its id
    async fn register_new_user(&self, email: String, password: String) -> AuthResult<i64>;

    /// Check whether the user holds an admin grant
    async fn is_admin(&self, user_id: i64) -> AuthResult<bool>;
}

/// Concrete implementation of AuthService over the persistence gateway.
pub struct Authenticator {
    user_saver: Arc<dyn UserSaver>,
    user_provider: Arc<dyn UserProvider>,
    app_provider: Arc<dyn AppProvider>,
    token_ttl: Duration,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(
        user_saver: Arc<dyn UserSaver>,
        user_provider: Arc<dyn UserProvider>,
        app_provider: Arc<dyn AppProvider>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            user_saver,
            user_provider,
            app_provider,
            token_ttl,
        }
    }
}

fn require_non_empty(field: &str, value: &str) -> AuthResult<()> {
    if value.is_empty() {
        return Err(AuthError::invalid_argument(format!("{} is required", field)));
    }
    Ok(())
}

// Argon2 is CPU-bound, keep it off the async workers
async fn hash_password(password: String) -> AuthResult<Password> {
    task::spawn_blocking(move || Password::new(&password))
        .await
        .map_err(AuthError::internal)?
        .map_err(AuthError::from)
}

async fn verify_password(stored: Password, password: String) -> AuthResult<bool> {
    let verdict = task::spawn_blocking(move || stored.verify(&password))
        .await
        .map_err(AuthError::internal)?;

    match verdict {
        Ok(matches) => Ok(matches),
        Err(e) => {
            // Corrupted hash: refuse the login rather than fail the request
            error!(error = %e, "stored password hash is malformed");
            Ok(false)
        }
    }
}

// Verified against when the email is unknown, so that path costs the same
// Argon2 work as a wrong password
fn dummy_password() -> Password {
    static DUMMY: OnceLock<Password> = OnceLock::new();
    DUMMY
        .get_or_init(|| {
            Password::new("sso-dummy-password")
                .unwrap_or_else(|_| Password::from_hash(Vec::new()))
        })
        .clone()
}

#[async_trait]
impl AuthService for Authenticator {
    #[instrument(name = "auth.login", skip(self, password), fields(op = "login"))]
    async fn login(&self, email: String, password: String, app_id: i32) -> AuthResult<String> {
        require_non_empty("email", &email)?;
        require_non_empty("password", &password)?;
        if app_id == 0 {
            return Err(AuthError::invalid_argument("app id is required"));
        }

        info!("attempting to login user");

        let user = match self.user_provider.user(&email).await {
            Ok(user) => user,
            Err(StorageError::UserNotFound) => {
                warn!("user not found");
                verify_password(dummy_password(), password).await?;
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                error!(error = %e, "failed to get user");
                return Err(AuthError::internal(e));
            }
        };

        if !verify_password(user.password(), password).await? {
            warn!(user_id = user.id, "invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let app = match self.app_provider.app(app_id).await {
            Ok(app) => app,
            Err(StorageError::AppNotFound) => {
                warn!("app not found");
                return Err(AuthError::InvalidAppId);
            }
            Err(e) => {
                error!(error = %e, "failed to get app");
                return Err(AuthError::internal(e));
            }
        };

        let token = token::issue(&user, &app, self.token_ttl).map_err(|e| {
            error!(error = %e, "failed to issue token");
            AuthError::internal(e)
        })?;

        info!(user_id = user.id, "user logged in successfully");
        Ok(token)
    }

    #[instrument(
        name = "auth.register_new_user",
        skip(self, password),
        fields(op = "register_new_user")
    )]
    async fn register_new_user(&self, email: String, password: String) -> AuthResult<i64> {
        require_non_empty("email", &email)?;
        require_non_empty("password", &password)?;

        info!("registering user");

        let hash = hash_password(password).await.map_err(|e| {
            error!(error = ?e, "failed to generate password hash");
            e
        })?;

        match self.user_saver.save_user(&email, hash.as_bytes()).await {
            Ok(user_id) => {
                info!(user_id, "user registered");
                Ok(user_id)
            }
            Err(StorageError::UserExists) => {
                warn!("user already exists");
                Err(AuthError::UserExists)
            }
            Err(e) => {
                error!(error = %e, "failed to save user");
                Err(AuthError::internal(e))
            }
        }
    }

    #[instrument(name = "auth.is_admin", skip(self), fields(op = "is_admin"))]
    async fn is_admin(&self, user_id: i64) -> AuthResult<bool> {
        if user_id == 0 {
            return Err(AuthError::invalid_argument("user id is required"));
        }

        info!("checking if user is admin");

        match self.user_provider.is_admin(user_id).await {
            Ok(is_admin) => {
                info!(is_admin, "checked if user is admin");
                Ok(is_admin)
            }
            Err(StorageError::UserNotFound) => {
                warn!("user not found");
                Err(AuthError::InvalidUserId)
            }
            Err(e) => {
                error!(error = %e, "failed to check admin status");
                Err(AuthError::internal(e))
            }
        }
    }
}
