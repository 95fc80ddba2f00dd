//! Authentication Error Types
//!
//! Centralized error handling for registration, login and the access guard.
//! Every variant maps to one HTTP status and a `{"error": "..."}` body.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Client input that failed validation (400)
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name, email and password are required")]
    MissingFields,

    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password must be at least 6 characters")]
    WeakPassword,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingFields | ValidationError::MissingCredentials => {
                "missing_fields"
            }
            ValidationError::InvalidEmail => "invalid_email",
            ValidationError::WeakPassword => "weak_password",
        }
    }
}

/// Reason the access guard turned a request away.
///
/// Only used for logging; all reasons render the same response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenRejection {
    #[error("no authorization header")]
    NoToken,

    #[error("authorization header is not `Bearer <token>`")]
    MalformedToken,

    #[error("token signature or expiry check failed")]
    InvalidOrExpired,
}

impl TokenRejection {
    pub fn code(&self) -> &'static str {
        match self {
            TokenRejection::NoToken => "no_token",
            TokenRejection::MalformedToken => "malformed_token",
            TokenRejection::InvalidOrExpired => "invalid_or_expired_token",
        }
    }
}

/// Authentication errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Malformed request body")]
    MalformedBody,

    #[error("Email already registered")]
    EmailTaken,

    /// Unknown email and wrong password both end up here.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or missing token")]
    Unauthorized(#[from] TokenRejection),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error")]
    Internal,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) | AuthError::MalformedBody => StatusCode::BAD_REQUEST,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::InvalidCredentials | AuthError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AuthError::Database(_) | AuthError::Config(_) | AuthError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Machine-readable error kind, for logs
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Validation(err) => err.code(),
            AuthError::MalformedBody => "malformed_body",
            AuthError::EmailTaken => "email_taken",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Unauthorized(reason) => reason.code(),
            AuthError::Database(_) | AuthError::Config(_) | AuthError::Internal => "internal_error",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(code = self.code(), "Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            tracing::debug!(code = self.code(), status = %status, "Request rejected: {}", self);
            self.to_string()
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AuthError::Database(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        tracing::error!("Password hashing error: {:?}", err);
        AuthError::Internal
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::error!("JWT signing error: {:?}", err);
        AuthError::Internal
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        AuthError::MalformedBody
    }
}
