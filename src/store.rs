//! Credential Store
//!
//! The `users` table behind a trait, so flows can run against PostgreSQL in
//! production and an in-memory map in tests. Email uniqueness is always the
//! store's job: a duplicate insert comes back as [`AuthError::EmailTaken`].

use crate::error::AuthError;
use crate::models::{NewUser, User};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Lookup and insert operations on user records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by exact (case-sensitive) email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// Insert a user, failing with `EmailTaken` if the email already exists
    async fn insert(&self, user: NewUser) -> Result<User, AuthError>;
}

// ============================================
// PostgreSQL
// ============================================

/// PostgreSQL-backed store; relies on the `UNIQUE` constraint on `users.email`
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get reference to the database pool
    pub fn db(&self) -> &PgPool {
        &self.db
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User, AuthError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db_err) = &err {
                if db_err.is_unique_violation() {
                    tracing::warn!("Concurrent registration for an existing email rejected");
                    return AuthError::EmailTaken;
                }
            }
            AuthError::from(err)
        })
    }
}

// ============================================
// In-memory
// ============================================

/// In-process store keyed by email
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, AuthError> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.email) {
            return Err(AuthError::EmailTaken);
        }

        let stored = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(stored.email.clone(), stored.clone());

        Ok(stored)
    }
}
