//! SSO service configuration.

use std::env;
use std::str::FromStr;

use common::{DatabaseConfig, GrpcServerConfig, TokenConfig};

/// SSO service configuration.
#[derive(Debug, Clone, Default)]
pub struct SsoServiceConfig {
    pub database: DatabaseConfig,
    pub token: TokenConfig,
    pub grpc: GrpcServerConfig,
}

impl SsoServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup, falling back to
    /// defaults for missing or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").unwrap_or(defaults.database.url),
                max_connections: parse_or(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    defaults.database.max_connections,
                ),
                min_connections: parse_or(
                    &lookup,
                    "DATABASE_MIN_CONNECTIONS",
                    defaults.database.min_connections,
                ),
            },
            token: TokenConfig {
                ttl_seconds: parse_or(&lookup, "TOKEN_TTL_SECONDS", defaults.token.ttl_seconds),
            },
            grpc: GrpcServerConfig {
                host: lookup("GRPC_HOST").unwrap_or(defaults.grpc.host),
                port: parse_or(&lookup, "GRPC_PORT", defaults.grpc.port),
                timeout_ms: parse_or(&lookup, "GRPC_TIMEOUT_MS", defaults.grpc.timeout_ms),
            },
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Invalid configuration value, using default");
            default
        }),
        None => default,
    }
}
