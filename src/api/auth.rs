//! Authorization gate for mutating routes
//!
//! `require_principal` runs before every state-changing handler. It rejects
//! requests without a verifiable bearer token with 401 before any store
//! access and injects the verified `Principal` into request extensions,
//! where handlers pick it up through the `Authenticated` extractor.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use super::rest::ApiError;
use super::state::AppState;
use crate::auth::{bearer_token, Principal};

/// Client-facing message for every rejection; the cause is only logged
const UNAUTHENTICATED: &str = "Unauthenticated";

/// Verify the bearer token and attach the principal to the request
pub async fn require_principal(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = bearer_token(auth_header).map_err(|e| {
        tracing::debug!(error = %e, "Rejected request without bearer token");
        ApiError::unauthenticated(UNAUTHENTICATED)
    })?;

    let principal = state.verifier.verify(token).await.map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        ApiError::unauthenticated(UNAUTHENTICATED)
    })?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// The principal verified by `require_principal`
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(Authenticated)
            .ok_or_else(|| {
                tracing::error!("Principal missing from request extensions; is the auth gate applied?");
                ApiError::internal("Internal server error")
            })
    }
}
