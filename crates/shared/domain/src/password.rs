//! Password value object - Argon2id hashing and verification.
//!
//! The encoded hash is a PHC string that embeds algorithm, version, cost
//! parameters and salt, so changing the cost constants only affects newly
//! produced hashes. Existing hashes keep verifying with the parameters they
//! were created with.

use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use crate::constants::{ARGON2_ITERATIONS, ARGON2_MEMORY_KIB, ARGON2_PARALLELISM};
use crate::error::{DomainError, DomainResult};

/// Password value object holding an encoded hash.
///
/// Never holds the plain text. The hash itself is treated as opaque bytes,
/// the way it is persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: Vec<u8>,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain text password with a fresh random salt.
    ///
    /// # Errors
    /// An empty plaintext is a validation error. Otherwise returns an
    /// internal error if the hasher cannot be built or fails,
    /// which only happens on misconfiguration or resource exhaustion.
    pub fn new(plain_text: &str) -> DomainResult<Self> {
        if plain_text.is_empty() {
            return Err(DomainError::validation("password must not be empty"));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()?
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::internal(format!("Password hash failed: {}", e)))?;

        Ok(Self {
            hash: hash.to_string().into_bytes(),
        })
    }

    /// Wrap a hash loaded from storage.
    pub fn from_hash(hash: Vec<u8>) -> Self {
        Self { hash }
    }

    /// Get the encoded hash for storage.
    pub fn as_bytes(&self) -> &[u8] {
        &self.hash
    }

    /// Consume and return the encoded hash.
    pub fn into_bytes(self) -> Vec<u8> {
        self.hash
    }

    /// Verify a plain text password against this hash.
    ///
    /// Returns `Ok(false)` on mismatch. An error means the stored hash
    /// itself is malformed (not UTF-8, not a PHC string, or produced by an
    /// unsupported algorithm).
    pub fn verify(&self, plain_text: &str) -> DomainResult<bool> {
        let encoded = std::str::from_utf8(&self.hash)
            .map_err(|_| DomainError::password("Stored hash is not valid UTF-8"))?;
        let parsed = PasswordHash::new(encoded)
            .map_err(|e| DomainError::password(format!("Invalid hash format: {}", e)))?;

        match Self::argon2()?.verify_password(plain_text.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(DomainError::password(format!(
                "Hash verification failed: {}",
                e
            ))),
        }
    }

    /// Argon2id with the configured cost parameters.
    fn argon2() -> DomainResult<Argon2<'static>> {
        let params = Params::new(ARGON2_MEMORY_KIB, ARGON2_ITERATIONS, ARGON2_PARALLELISM, None)
            .map_err(|e| DomainError::internal(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl From<Password> for Vec<u8> {
    fn from(password: Password) -> Self {
        password.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let plain = "SecurePassword123!";
        let password = Password::new(plain).unwrap();

        assert!(password.verify(plain).unwrap());
        assert!(!password.verify("WrongPassword123").unwrap());
    }

    #[test]
    fn test_password_from_hash() {
        let plain = "pw1";
        let stored = Password::new(plain).unwrap().into_bytes();

        let restored = Password::from_hash(stored);
        assert!(restored.verify(plain).unwrap());
        assert!(!restored.verify("pw2").unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = "SamePassword123";
        let pass1 = Password::new(plain).unwrap();
        let pass2 = Password::new(plain).unwrap();

        assert_ne!(pass1.as_bytes(), pass2.as_bytes());
        assert!(pass1.verify(plain).unwrap());
        assert!(pass2.verify(plain).unwrap());
    }

    #[test]
    fn test_hash_embeds_parameters() {
        let password = Password::new("pw").unwrap();
        let encoded = std::str::from_utf8(password.as_bytes()).unwrap();

        assert!(encoded.starts_with("$argon2id$v=19$"));
        assert!(encoded.contains(&format!("m={}", ARGON2_MEMORY_KIB)));
        assert!(encoded.contains(&format!("t={}", ARGON2_ITERATIONS)));
    }

    #[test]
    fn test_hash_with_other_cost_still_verifies() {
        let params = Params::new(8 * 1024, 1, 1, None).unwrap();
        let cheap = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);
        let hash = cheap.hash_password(b"legacy", &salt).unwrap().to_string();

        let stored = Password::from_hash(hash.into_bytes());
        assert!(stored.verify("legacy").unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let garbage = Password::from_hash(b"not-a-phc-string".to_vec());
        assert!(matches!(garbage.verify("pw"), Err(DomainError::Password(_))));

        let not_utf8 = Password::from_hash(vec![0xff, 0xfe, 0xfd]);
        assert!(matches!(not_utf8.verify("pw"), Err(DomainError::Password(_))));
    }

    #[test]
    fn test_empty_password_is_rejected() {
        assert!(matches!(Password::new(""), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_debug_redacts_hash() {
        let password = Password::new("secret").unwrap();
        let debug = format!("{:?}", password);

        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("argon2"));
    }
}
