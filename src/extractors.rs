//! Authentication Extractors
//!
//! Axum extractors for the caller's identity and JSON request bodies.

use crate::error::{AuthError, TokenRejection};
use crate::models::Claims;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};

/// Identity of the caller, as decoded by [`require_auth`](crate::middleware::require_auth)
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Claims>() {
            Some(claims) => Ok(AuthUser(claims.clone())),
            None => {
                tracing::warn!(
                    path = %parts.uri.path(),
                    "AuthUser extracted on a route without require_auth"
                );
                Err(AuthError::Unauthorized(TokenRejection::NoToken))
            }
        }
    }
}

/// `axum::Json` whose rejection renders as [`AuthError::MalformedBody`]
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AuthError))]
pub struct JsonBody<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_auth_user_reads_extensions() {
        let claims = Claims {
            id: Uuid::new_v4(),
            email: "a@b.com".into(),
            name: "A".into(),
            iat: 0,
            exp: 86400,
        };

        let mut req = Request::new(Body::empty());
        req.extensions_mut().insert(claims.clone());
        let (mut parts, _) = req.into_parts();

        let AuthUser(extracted) = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted, claims);
    }

    #[tokio::test]
    async fn test_auth_user_without_guard_is_rejected() {
        let (mut parts, _) = Request::new(Body::empty()).into_parts();

        let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Unauthorized(TokenRejection::NoToken)
        ));
    }
}
