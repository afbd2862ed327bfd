//! Event endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde_json::Value;

use super::ApiError;
use crate::api::auth::Authenticated;
use crate::api::state::AppState;
use crate::service::{CreatedEvent, EventQuery, OperationMessage};
use crate::types::Event;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// POST /events - Create an event owned by the caller
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Authenticated(principal): Authenticated,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<CreatedEvent> {
    let Json(body) = body?;
    Ok(Json(state.events.create(&principal, body).await?))
}

/// GET /events - Upcoming events, optionally filtered
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventQuery>,
) -> ApiResult<Vec<Event>> {
    Ok(Json(state.events.list(&query).await?))
}

/// GET /events/:id - Single event
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Event> {
    Ok(Json(state.events.get(&id).await?))
}

/// PATCH /events/:id - Join with `{email}`, or replace the given fields
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<OperationMessage> {
    let Json(body) = body?;
    Ok(Json(state.events.update(&principal, &id, body).await?))
}

/// PATCH /events/:id/cancel - Remove `{email}` from the attendees
pub async fn cancel_attendance(
    State(state): State<Arc<AppState>>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<OperationMessage> {
    let Json(body) = body?;
    Ok(Json(state.events.cancel(&principal, &id, body).await?))
}

/// DELETE /events/:id - Remove the event
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
) -> ApiResult<OperationMessage> {
    Ok(Json(state.events.delete(&principal, &id).await?))
}
