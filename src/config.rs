//! Authentication Configuration
//!
//! All configuration values are loaded from environment variables once at
//! startup and passed explicitly into the components that need them.

use crate::error::AuthError;
use std::env;

/// Authentication configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT secret key for signing tokens (from JWT_SECRET env var)
    pub jwt_secret: String,

    /// PostgreSQL connection string (from DATABASE_URL env var).
    /// Only the server binary needs it.
    pub database_url: Option<String>,

    /// HTTP listen port (from PORT env var)
    pub port: u16,

    /// Argon2 memory cost in KiB (from ARGON2_MEMORY_COST env var)
    pub argon2_memory_cost: u32,

    /// Argon2 time cost (iterations) (from ARGON2_TIME_COST env var)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (from ARGON2_PARALLELISM env var)
    pub argon2_parallelism: u32,
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_source<F>(get: F) -> Result<Self, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| get(key).filter(|v| !v.is_empty());

        Ok(Self {
            jwt_secret: optional("JWT_SECRET").ok_or_else(|| missing("JWT_SECRET"))?,

            database_url: optional("DATABASE_URL"),

            port: get("PORT").and_then(|v| v.parse().ok()).unwrap_or(3000),

            argon2_memory_cost: get("ARGON2_MEMORY_COST")
                .and_then(|v| v.parse().ok())
                .unwrap_or(65536), // 64 MiB

            argon2_time_cost: get("ARGON2_TIME_COST")
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),

            argon2_parallelism: get("ARGON2_PARALLELISM")
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.jwt_secret.len() < 32 {
            return Err(AuthError::Config(
                "JWT_SECRET must be at least 32 characters".to_string(),
            ));
        }

        self.argon2_params()?;

        Ok(())
    }

    /// Connection string for callers that talk to PostgreSQL
    pub fn require_database_url(&self) -> Result<&str, AuthError> {
        self.database_url
            .as_deref()
            .ok_or_else(|| missing("DATABASE_URL"))
    }

    /// Argon2 cost parameters
    pub fn argon2_params(&self) -> Result<argon2::Params, AuthError> {
        argon2::Params::new(
            self.argon2_memory_cost,
            self.argon2_time_cost,
            self.argon2_parallelism,
            None,
        )
        .map_err(|e| AuthError::Config(format!("invalid Argon2 parameters: {e}")))
    }
}

fn missing(key: &str) -> AuthError {
    AuthError::Config(format!("{key} environment variable must be set"))
}

/// Config with cheap hashing costs so tests stay fast
#[cfg(test)]
pub(crate) fn test_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret-key-that-is-long-enough".to_string(),
        database_url: None,
        port: 0,
        argon2_memory_cost: 1024,
        argon2_time_cost: 1,
        argon2_parallelism: 1,
    }
}
