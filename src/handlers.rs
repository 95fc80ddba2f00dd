//! Authentication HTTP Handlers
//!
//! REST API endpoints for registration, login and the protected profile.

use crate::error::AuthError;
use crate::extractors::{AuthUser, JsonBody};
use crate::middleware;
use crate::models::*;
use crate::service::AuthService;

use axum::{
    extract::State,
    http::StatusCode,
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared auth service state
pub type AuthState = Arc<AuthService>;

// ============================================
// Route Builder
// ============================================

/// Create authentication routes
pub fn create_routes(auth_service: AuthState) -> Router {
    // Public routes (no authentication required)
    let public = Router::new()
        .route("/", get(index))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login));

    // Protected routes (require authentication)
    let protected = Router::new()
        .route("/api/profile", get(profile))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_service.token_codec(),
            middleware::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(auth_service)
}

// ============================================
// Index
// ============================================

/// GET /
///
/// Liveness check listing the available endpoints
pub async fn index() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Authentication API is running",
        "endpoints": {
            "register": "POST /api/auth/register",
            "login": "POST /api/auth/login",
            "profile": "GET /api/profile (requires token)"
        }
    }))
}

// ============================================
// Registration
// ============================================

/// POST /api/auth/register
///
/// Register a new user account
pub async fn register(
    State(auth): State<AuthState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let user = auth.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "User created successfully",
            "user": user
        })),
    ))
}

// ============================================
// Login
// ============================================

/// POST /api/auth/login
///
/// Authenticate user and return a bearer token
pub async fn login(
    State(auth): State<AuthState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let AuthResponse { token, user } = auth.login(req).await?;

    Ok(Json(serde_json::json!({
        "message": "Login successful",
        "token": token,
        "user": user
    })))
}

// ============================================
// User Profile
// ============================================

/// GET /api/profile
///
/// Echo the caller's token claims
pub async fn profile(AuthUser(claims): AuthUser) -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Access granted",
        "user": claims
    }))
}
