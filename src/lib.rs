//! Social Events API
//!
//! Backend for social events: creation, discovery, join/cancel attendance,
//! update and deletion, with every mutating operation behind bearer-token
//! identity verification.
//!
//! # Modules
//!
//! - `types`: Event document, status and id types
//! - `store`: `EventStore` contract with in-memory and JSONL backends
//! - `auth`: `IdentityVerifier` contract and the JWT verifier
//! - `service`: Event lifecycle and attendance state machine
//! - `api`: Axum router, auth gate and REST handlers
//! - `config`: Environment configuration
//! - `utils`: Timestamps and atomic file writes
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use social_events::{create_router, AppState, EventService, JwtVerifier, MemoryStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(MemoryStore::new());
//!     let verifier = Arc::new(
//!         JwtVerifier::with_secret("a-local-secret-of-at-least-32-characters").unwrap(),
//!     );
//!     let state = Arc::new(AppState::new(EventService::new(store), verifier));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, create_router(state)).await.unwrap();
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod service;
pub mod store;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use api::{create_router, AppState};
pub use auth::{AuthError, IdentityVerifier, JwtVerifier, Principal};
pub use config::{ConfigError, ServerConfig};
pub use service::{EventError, EventQuery, EventService};
pub use store::{EventFilter, EventStore, JsonlStore, MemoryStore, StoreError};
pub use types::{Event, EventId, EventStatus};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
