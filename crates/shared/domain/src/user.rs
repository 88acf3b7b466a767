//! User domain entity.

use serde::{Deserialize, Serialize};

use crate::password::Password;

/// User domain entity
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    /// Storage-assigned identifier
    pub id: i64,
    /// Unique login email, compared as stored
    pub email: String,
    /// Encoded password hash, never serialized
    #[serde(skip)]
    pub pass_hash: Vec<u8>,
}

// Don't expose hash in debug output
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("pass_hash", &"[REDACTED]")
            .finish()
    }
}

impl User {
    pub fn new(id: i64, email: String, pass_hash: Vec<u8>) -> Self {
        Self {
            id,
            email,
            pass_hash,
        }
    }

    /// Stored password hash as a value object.
    pub fn password(&self) -> Password {
        Password::from_hash(self.pass_hash.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_password_roundtrip() {
        let hash = Password::new("pw1").unwrap().into_bytes();
        let user = User::new(1, "a@x.com".to_string(), hash);

        assert!(user.password().verify("pw1").unwrap());
    }

    #[test]
    fn test_user_debug_and_serialize_hide_hash() {
        let user = User::new(7, "a@x.com".to_string(), b"$argon2id$secret".to_vec());

        let debug = format!("{:?}", user);
        assert!(!debug.contains("argon2id"));

        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(json, r#"{"id":7,"email":"a@x.com"}"#);
    }
}
