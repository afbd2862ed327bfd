//! HTTP API
//!
//! Axum router, the authorization gate, and the REST handlers for events.

pub mod auth;
pub mod http;
pub mod rest;
pub mod state;

pub use http::create_router;
pub use state::AppState;
