//! Registered application (client scope) entity.

use serde::{Deserialize, Serialize};

/// A registered application that session tokens are issued for.
///
/// Each application signs its tokens with its own secret, so rotating one
/// app's secret invalidates only that app's sessions.
#[derive(Clone, Serialize, Deserialize)]
pub struct App {
    pub id: i32,
    pub name: String,
    /// Token signing secret, never serialized
    #[serde(skip)]
    pub secret: Vec<u8>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl App {
    pub fn new(id: i32, name: String, secret: Vec<u8>) -> Self {
        Self { id, name, secret }
    }

    /// Whether the app can sign tokens at all
    pub fn has_secret(&self) -> bool {
        !self.secret.is_empty()
    }
}
