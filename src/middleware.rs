//! Authentication Middleware
//!
//! Access guard for identity-requiring routes. Verified claims are stored in
//! request extensions for the [`AuthUser`](crate::extractors::AuthUser) extractor.

use crate::error::{AuthError, TokenRejection};
use crate::token::TokenCodec;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Pull the token out of an `Authorization` header value.
///
/// The value must be exactly `Bearer <token>`: two parts separated by one space.
pub fn bearer_token(header: Option<&str>) -> Result<&str, TokenRejection> {
    let header = match header {
        None | Some("") => return Err(TokenRejection::NoToken),
        Some(value) => value,
    };

    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(TokenRejection::MalformedToken),
    }
}

/// Require authenticated user
///
/// Rejects with 401 when the header is absent, malformed, or carries a token
/// that fails signature or expiry checks.
pub async fn require_auth(
    State(tokens): State<Arc<TokenCodec>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let verified = match req.headers().get(AUTHORIZATION).map(|h| h.to_str()) {
        None => Err(TokenRejection::NoToken),
        // not visible ASCII
        Some(Err(_)) => Err(TokenRejection::MalformedToken),
        Some(Ok(value)) => bearer_token(Some(value)).and_then(|token| tokens.verify(token)),
    };

    let claims = verified.map_err(|reason| {
        tracing::debug!(
            reason = reason.code(),
            path = %req.uri().path(),
            "Request rejected by access guard"
        );
        AuthError::Unauthorized(reason)
    })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
