//! Domain-level constants.
//!
//! These constants define security parameters and business rules.

// =============================================================================
// Password hashing (Argon2id)
// =============================================================================

/// Argon2 memory cost in KiB
pub const ARGON2_MEMORY_KIB: u32 = 19_456;

/// Argon2 number of passes over memory
pub const ARGON2_ITERATIONS: u32 = 2;

/// Argon2 degree of parallelism
pub const ARGON2_PARALLELISM: u32 = 1;

// =============================================================================
// Session tokens
// =============================================================================

/// Default session token time-to-live in seconds (1 hour)
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;

// =============================================================================
// Applications
// =============================================================================

/// Minimum signing secret length accepted when provisioning an app
pub const MIN_APP_SECRET_LENGTH: usize = 32;
