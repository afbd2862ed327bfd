//! Event Lifecycle Service - core of the social events backend
//!
//! Enforces the event data-model invariants (server-initialized status and
//! attendees, unique attendees, immutable id) and the attendance state
//! machine on top of an `EventStore`. Mutating operations take a verified
//! `Principal`, so they cannot be called without passing the auth gate.

mod attendance;
mod crud;
mod payload;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::auth::Principal;
use crate::store::{EventStore, StoreError};
use crate::types::{Event, EventId};

pub use payload::PROTECTED_FIELDS;

/// Lifecycle failures
#[derive(Debug, Error)]
pub enum EventError {
    /// Malformed id, missing field, no-op body, or an attendance no-op
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("store failure: {0}")]
    Infrastructure(#[from] StoreError),
}

impl EventError {
    pub fn invalid(message: impl Into<String>) -> Self {
        EventError::InvalidInput(message.into())
    }

    pub fn not_found(id: &EventId) -> Self {
        EventError::NotFound(format!("Event '{}' not found", id))
    }
}

/// Result type for lifecycle operations
pub type EventResult<T> = Result<T, EventError>;

/// Outcome of a successful create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedEvent {
    pub message: String,
    #[serde(rename = "insertedId")]
    pub inserted_id: EventId,
}

/// Outcome of a successful update, join, cancel or delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationMessage {
    pub message: String,
}

impl OperationMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Listing parameters as supplied by the caller
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventQuery {
    /// Free text matched case-insensitively against titles
    pub search: Option<String>,
    /// Exact event type; the sentinel `All` disables the filter
    #[serde(rename = "eventType")]
    pub event_type: Option<String>,
}

/// Lifecycle operations over a shared store
#[derive(Clone)]
pub struct EventService {
    pub(crate) store: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn EventStore> {
        &self.store
    }
}

// Operations live in the submodules
impl EventService {
    pub async fn create(&self, principal: &Principal, body: Value) -> EventResult<CreatedEvent> {
        crud::create(self, principal, body).await
    }

    pub async fn list(&self, query: &EventQuery) -> EventResult<Vec<Event>> {
        crud::list(self, query).await
    }

    pub async fn get(&self, id: &str) -> EventResult<Event> {
        crud::get(self, id).await
    }

    /// General update: `{email}` joins, any other fields are replaced
    pub async fn update(
        &self,
        principal: &Principal,
        id: &str,
        body: Value,
    ) -> EventResult<OperationMessage> {
        crud::update(self, principal, id, body).await
    }

    pub async fn join(
        &self,
        principal: &Principal,
        id: &str,
        email: &str,
    ) -> EventResult<OperationMessage> {
        let id = payload::parse_id(id)?;
        let email = payload::parse_email(email)?;
        attendance::join(self, principal, &id, &email).await
    }

    pub async fn cancel(
        &self,
        principal: &Principal,
        id: &str,
        body: Value,
    ) -> EventResult<OperationMessage> {
        attendance::cancel(self, principal, id, body).await
    }

    pub async fn delete(&self, principal: &Principal, id: &str) -> EventResult<OperationMessage> {
        crud::delete(self, principal, id).await
    }
}
