//! Caller-facing error taxonomy of the authentication service.
//!
//! Every collaborator failure is classified into exactly one of these
//! variants before it leaves the service. Transport adapters map them onto
//! their own status codes (see the `tonic::Status` conversion below).

use domain::DomainError;
use thiserror::Error;
use tonic::Status;

/// Boxed error kept as the diagnostic cause of [`AuthError::Internal`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Authentication error types.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Malformed or missing input, detected before any collaborator call
    #[error("{0}")]
    InvalidArgument(String),

    /// Unknown email or wrong password, deliberately not told apart
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Referenced application does not exist
    #[error("Invalid app id")]
    InvalidAppId,

    /// Referenced user does not exist
    #[error("Invalid user id")]
    InvalidUserId,

    /// Registration collided with an existing email
    #[error("User already exists")]
    UserExists,

    /// Any other failure. The cause is for logs only.
    #[error("Internal error")]
    Internal(#[source] BoxError),
}

impl AuthError {
    /// Get stable error code for clients
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidArgument(_) => "INVALID_ARGUMENT",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::InvalidAppId => "INVALID_APP_ID",
            AuthError::InvalidUserId => "INVALID_USER_ID",
            AuthError::UserExists => "USER_EXISTS",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials => "invalid email or password".to_string(),
            AuthError::Internal(cause) => {
                tracing::error!(error = %cause, "Internal error");
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        AuthError::InvalidArgument(msg.into())
    }

    pub fn internal(cause: impl Into<BoxError>) -> Self {
        AuthError::Internal(cause.into())
    }
}

// =============================================================================
// gRPC Status (Tonic)
// =============================================================================

impl From<AuthError> for Status {
    fn from(err: AuthError) -> Self {
        let code = match &err {
            AuthError::InvalidArgument(_) | AuthError::InvalidAppId => tonic::Code::InvalidArgument,
            AuthError::InvalidCredentials => tonic::Code::Unauthenticated,
            AuthError::InvalidUserId => tonic::Code::NotFound,
            AuthError::UserExists => tonic::Code::AlreadyExists,
            AuthError::Internal(_) => tonic::Code::Internal,
        };

        Status::new(code, err.user_message())
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AuthError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AuthError::InvalidArgument(msg),
            other => AuthError::internal(other),
        }
    }
}

/// Result type alias
pub type AuthResult<T> = Result<T, AuthError>;
