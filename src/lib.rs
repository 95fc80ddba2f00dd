//! Credential Gate
//!
//! Minimal authentication API providing:
//! - User registration with Argon2id password hashing
//! - Login with anti-enumeration credential checks
//! - 24-hour HS256 bearer tokens
//! - An access guard for identity-requiring routes
//!
//! # Configuration
//!
//! All configuration is loaded from environment variables:
//! - `JWT_SECRET` - Secret key for signing JWTs (required, min 32 chars)
//! - `DATABASE_URL` - PostgreSQL connection string (required by the server binary)
//! - `PORT` - HTTP listen port (default: 3000)
//! - `ARGON2_MEMORY_COST`, `ARGON2_TIME_COST`, `ARGON2_PARALLELISM` - hashing cost
//!
//! # Usage
//!
//! ```rust,ignore
//! use credential_gate::{build_router, ensure_schema, AuthConfig, AuthService, PgUserStore};
//!
//! let config = AuthConfig::from_env()?;
//! config.validate()?;
//!
//! let db = sqlx::PgPool::connect(config.require_database_url()?).await?;
//! ensure_schema(&db).await?;
//!
//! let store = Arc::new(PgUserStore::new(db));
//! let app = build_router(Arc::new(AuthService::new(store, config)));
//! ```

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod service;
pub mod store;
pub mod token;

// Re-export commonly used types
pub use config::AuthConfig;
pub use error::{AuthError, TokenRejection, ValidationError};
pub use extractors::{AuthUser, JsonBody};
pub use handlers::AuthState;
pub use models::*;
pub use service::AuthService;
pub use store::{MemoryUserStore, PgUserStore, UserStore};
pub use token::{TokenCodec, TOKEN_TTL_SECS};

use axum::Router;
use sqlx::PgPool;

/// Create the application router
pub fn build_router(auth_service: AuthState) -> Router {
    handlers::create_routes(auth_service)
}

/// Create the `users` table if it does not exist yet.
///
/// The `UNIQUE` constraint on `email` is what keeps concurrent registrations
/// for the same address from both succeeding.
pub async fn ensure_schema(db: &PgPool) -> Result<(), AuthError> {
    tracing::info!("Ensuring users table exists");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(db)
    .await?;

    Ok(())
}
