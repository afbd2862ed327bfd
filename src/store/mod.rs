//! Event Store - persistent collection of event documents
//!
//! `EventStore` is the only path from the lifecycle service to storage.
//! Every primitive is atomic: it runs under a single write-lock acquisition,
//! which is what keeps concurrent joins of the same email from both
//! appending.

mod collection;
mod filter;
mod jsonl;
mod memory;

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{Event, EventId, EventUpdate, NewEvent};

pub use collection::Collection;
pub use filter::EventFilter;
pub use jsonl::JsonlStore;
pub use memory::MemoryStore;

/// Storage failures. Always infrastructure-level from the caller's point of view.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt record at {path}:{line}: {source}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document-collection contract over events
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert a new event; the store assigns the id, sets `status = upcoming`
    /// and an empty attendee list
    async fn insert(&self, event: NewEvent) -> StoreResult<EventId>;

    /// All events matching every condition of `filter`, in insertion order
    async fn find_many(&self, filter: &EventFilter) -> StoreResult<Vec<Event>>;

    async fn find_one(&self, id: &EventId) -> StoreResult<Option<Event>>;

    /// Replace the named fields. Returns the matched count (0 or 1)
    async fn update_fields(&self, id: &EventId, update: &EventUpdate) -> StoreResult<u64>;

    /// Append `email` only when the event exists and does not list it yet.
    /// Returns the modified count: 0 covers both "no such event" and
    /// "already attending"
    async fn add_attendee_if_absent(&self, id: &EventId, email: &str) -> StoreResult<u64>;

    /// Remove `email` from the attendees. 0 when absent or the id is unmatched
    async fn remove_attendee(&self, id: &EventId, email: &str) -> StoreResult<u64>;

    /// Returns the deleted count (0 or 1)
    async fn delete_one(&self, id: &EventId) -> StoreResult<u64>;

    /// Number of stored events
    async fn count(&self) -> StoreResult<usize>;
}
