//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, patch, post, MethodRouter},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::require_principal;
use super::rest::{events, ApiError};
use super::state::AppState;

/// Create the Axum router with all endpoints.
///
/// Every state-changing route sits behind the `require_principal` gate;
/// read routes are public.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - browser clients are served from other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mutating = Router::new()
        .route("/events", post(events::create_event))
        .route(
            "/events/:id",
            patch(events::update_event).delete(events::delete_event),
        )
        .route("/events/:id/cancel", patch(events::cancel_attendance))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_principal,
        ));

    // Explicit fallbacks keep unknown methods on shared paths at 405
    // instead of falling into the gated router's fallback.
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route(
            "/events",
            get(events::list_events).fallback(method_not_allowed),
        )
        .route(
            "/events/:id",
            get(events::get_event).fallback(method_not_allowed),
        )
        .route(
            "/events/:id/cancel",
            MethodRouter::new().fallback(method_not_allowed),
        )
        .merge(mutating)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn method_not_allowed() -> StatusCode {
    StatusCode::METHOD_NOT_ALLOWED
}

/// Liveness text
async fn root() -> &'static str {
    "Social Events API is running!"
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    events: usize,
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    let events = state.events.store().count().await.map_err(|e| {
        tracing::error!(error = %e, "Health check could not reach the store");
        ApiError::internal("Store unavailable")
    })?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
        events,
    }))
}
