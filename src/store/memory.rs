//! In-memory event store

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::types::{Event, EventId, EventUpdate, NewEvent};

use super::{Collection, EventFilter, EventStore, StoreResult};

/// Volatile store; contents are lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStore {
    collection: RwLock<Collection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn insert(&self, event: NewEvent) -> StoreResult<EventId> {
        Ok(self.collection.write().insert(event))
    }

    async fn find_many(&self, filter: &EventFilter) -> StoreResult<Vec<Event>> {
        Ok(self.collection.read().find_many(filter))
    }

    async fn find_one(&self, id: &EventId) -> StoreResult<Option<Event>> {
        Ok(self.collection.read().find_one(id))
    }

    async fn update_fields(&self, id: &EventId, update: &EventUpdate) -> StoreResult<u64> {
        Ok(self.collection.write().update_fields(id, update))
    }

    async fn add_attendee_if_absent(&self, id: &EventId, email: &str) -> StoreResult<u64> {
        Ok(self.collection.write().add_attendee_if_absent(id, email))
    }

    async fn remove_attendee(&self, id: &EventId, email: &str) -> StoreResult<u64> {
        Ok(self.collection.write().remove_attendee(id, email))
    }

    async fn delete_one(&self, id: &EventId) -> StoreResult<u64> {
        Ok(self.collection.write().delete_one(id))
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.collection.read().len())
    }
}
