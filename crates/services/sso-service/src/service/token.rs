//! Session token issuance.
//!
//! Tokens are HS256 JWTs signed with the secret of the app they are issued
//! for, never with a global key. There is no session table: a token is
//! valid until it expires or its app's secret is rotated.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use domain::{App, User};

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject user id
    pub uid: i64,
    pub email: String,
    /// App the token was issued for
    pub app_id: i32,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
    /// Unique token id
    pub jti: Uuid,
}

/// Token issuance and verification failures.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("app {0} has no signing secret")]
    EmptySecret(i32),

    #[error("token ttl does not fit the expiry timestamp")]
    TtlOutOfRange,

    #[error("token was issued for app {actual}, not app {expected}")]
    AppMismatch { expected: i32, actual: i32 },

    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Issue a signed token for `user` scoped to `app`.
///
/// `exp - iat` equals `ttl` in whole seconds; sub-second parts of `ttl` are
/// dropped.
pub fn issue(user: &User, app: &App, ttl: Duration) -> Result<String, TokenError> {
    if !app.has_secret() {
        return Err(TokenError::EmptySecret(app.id));
    }

    let ttl_seconds = i64::try_from(ttl.as_secs()).map_err(|_| TokenError::TtlOutOfRange)?;
    let issued_at = Utc::now().timestamp();
    let expires_at = issued_at
        .checked_add(ttl_seconds)
        .ok_or(TokenError::TtlOutOfRange)?;

    let claims = Claims {
        uid: user.id,
        email: user.email.clone(),
        app_id: app.id,
        iat: issued_at,
        exp: expires_at,
        jti: Uuid::new_v4(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(&app.secret),
    )?;

    Ok(token)
}

/// Verify a token against the secret of the app it claims to belong to.
///
/// Expired tokens are rejected with no leeway.
pub fn verify(token: &str, app: &App) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(&app.secret), &validation)?;

    if token_data.claims.app_id != app.id {
        return Err(TokenError::AppMismatch {
            expected: app.id,
            actual: token_data.claims.app_id,
        });
    }

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::new(1, "a@x.com".to_string(), Vec::new())
    }

    fn test_app(id: i32) -> App {
        App::new(id, "test-app".to_string(), b"test-secret-that-is-long-enough!".to_vec())
    }

    #[test]
    fn test_issue_and_verify() {
        let app = test_app(42);
        let token = issue(&test_user(), &app, Duration::from_secs(3600)).unwrap();

        assert!(!token.is_empty());

        let claims = verify(&token, &app).unwrap();
        assert_eq!(claims.uid, 1);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.app_id, 42);
    }

    #[test]
    fn test_expiry_is_exactly_ttl() {
        let app = test_app(42);
        let token = issue(&test_user(), &app, Duration::from_secs(900)).unwrap();

        let claims = verify(&token, &app).unwrap();
        assert_eq!(claims.exp - claims.iat, 900);
        assert!((claims.iat - Utc::now().timestamp()).abs() <= 1);
    }

    #[test]
    fn test_tokens_differ_per_call() {
        let app = test_app(42);
        let first = issue(&test_user(), &app, Duration::from_secs(60)).unwrap();
        let second = issue(&test_user(), &app, Duration::from_secs(60)).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let app = App::new(7, "no-secret".to_string(), Vec::new());
        let result = issue(&test_user(), &app, Duration::from_secs(60));

        assert!(matches!(result, Err(TokenError::EmptySecret(7))));
    }

    #[test]
    fn test_huge_ttl_is_rejected() {
        let result = issue(&test_user(), &test_app(42), Duration::from_secs(u64::MAX));
        assert!(matches!(result, Err(TokenError::TtlOutOfRange)));
    }

    #[test]
    fn test_other_app_secret_fails_verification() {
        let token = issue(&test_user(), &test_app(42), Duration::from_secs(60)).unwrap();
        let other = App::new(42, "rotated".to_string(), b"another-secret-entirely-different".to_vec());

        assert!(matches!(verify(&token, &other), Err(TokenError::Jwt(_))));
    }

    #[test]
    fn test_app_id_mismatch_is_rejected() {
        let token = issue(&test_user(), &test_app(42), Duration::from_secs(60)).unwrap();

        let result = verify(&token, &test_app(43));
        assert!(matches!(
            result,
            Err(TokenError::AppMismatch { expected: 43, actual: 42 })
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let app = test_app(42);
        let now = Utc::now().timestamp();
        let claims = Claims {
            uid: 1,
            email: "a@x.com".to_string(),
            app_id: 42,
            iat: now - 120,
            exp: now - 60,
            jti: Uuid::new_v4(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&app.secret),
        )
        .unwrap();

        let result = verify(&token, &app);
        assert!(matches!(
            result,
            Err(TokenError::Jwt(e)) if matches!(e.kind(), jsonwebtoken::errors::ErrorKind::ExpiredSignature)
        ));
    }
}
