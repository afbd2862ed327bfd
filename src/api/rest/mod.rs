//! REST API module for HTTP endpoints
//!
//! - `GET /events` - List upcoming events (`search`, `eventType`)
//! - `GET /events/:id` - Get single event
//! - `POST /events` - Create event [auth]
//! - `PATCH /events/:id` - Join (`{email}`) or update fields [auth]
//! - `PATCH /events/:id/cancel` - Cancel attendance [auth]
//! - `DELETE /events/:id` - Delete event [auth]

pub mod events;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::service::EventError;

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub code: &'static str,
}

impl ApiError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: message.into(),
            code: "UNAUTHENTICATED",
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: message.into(),
            code: "INVALID_INPUT",
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: message.into(),
            code: "NOT_FOUND",
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: message.into(),
            code: "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<EventError> for ApiError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::InvalidInput(message) => ApiError::bad_request(message),
            EventError::NotFound(message) => ApiError::not_found(message),
            EventError::Infrastructure(e) => {
                // Full detail stays in the server log
                tracing::error!(error = %e, "Store operation failed");
                ApiError::internal("Internal server error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}
