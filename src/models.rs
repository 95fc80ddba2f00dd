//! Authentication Models
//!
//! Data structures for authentication requests, responses, and database entities.

use crate::error::ValidationError;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::sync::LazyLock;
use uuid::Uuid;
use validator::Validate;

/// `local@domain.tld`, no whitespace and a single `@`
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

// ============================================
// Database Entities
// ============================================

/// User entity from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User row about to be inserted; the store assigns `id` and `created_at`
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

// ============================================
// Request DTOs
// ============================================

/// Registration request
///
/// Fields are optional so that an absent field and an empty one are
/// reported the same way.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Registration input that passed every validation rule
#[derive(Debug, Clone, Validate)]
pub struct RegistrationForm {
    pub name: String,

    #[validate(regex(path = *EMAIL_PATTERN, code = "invalid_email"))]
    pub email: String,

    #[validate(custom(function = "password_length"))]
    pub password: String,
}

/// Minimum password length in UTF-16 code units
const MIN_PASSWORD_UNITS: usize = 6;

fn password_length(password: &str) -> Result<(), validator::ValidationError> {
    if password.encode_utf16().count() < MIN_PASSWORD_UNITS {
        return Err(validator::ValidationError::new("weak_password"));
    }
    Ok(())
}

impl RegisterRequest {
    /// Validate in a fixed order: presence, email shape, password length.
    pub fn into_form(self) -> Result<RegistrationForm, ValidationError> {
        let (Some(name), Some(email), Some(password)) = (
            present(self.name),
            present(self.email),
            present(self.password),
        ) else {
            return Err(ValidationError::MissingFields);
        };

        let form = RegistrationForm {
            name,
            email,
            password,
        };

        form.validate().map_err(|errors| {
            if errors.field_errors().contains_key("email") {
                ValidationError::InvalidEmail
            } else {
                ValidationError::WeakPassword
            }
        })?;

        Ok(form)
    }
}

/// Login request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Email/password pair with both parts present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn into_credentials(self) -> Result<Credentials, ValidationError> {
        match (present(self.email), present(self.password)) {
            (Some(email), Some(password)) => Ok(Credentials { email, password }),
            _ => Err(ValidationError::MissingCredentials),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// ============================================
// Response DTOs
// ============================================

/// User response (public user data without the password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Successful login: bearer token plus public user data
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

// ============================================
// JWT Claims
// ============================================

/// JWT claims carried by every issued token.
///
/// `id`, `email` and `name` are a snapshot of the user at login time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}
