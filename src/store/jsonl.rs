//! JSONL-backed event store
//!
//! The whole collection is loaded at open time and rewritten atomically
//! after every mutation that changed something. A failed write restores the
//! previous in-memory state so memory and disk never diverge.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::runtime::{Handle, RuntimeFlavor};

use crate::types::{Event, EventId, EventUpdate, NewEvent};
use crate::utils::atomic::atomic_write_with;

use super::{Collection, EventFilter, EventStore, StoreError, StoreResult};

/// File-persisted store, one event document per line
#[derive(Debug)]
pub struct JsonlStore {
    path: PathBuf,
    collection: RwLock<Collection>,
}

impl JsonlStore {
    /// Open (or start) the store at `path`. A missing file is an empty store;
    /// an unreadable or corrupt one is an error.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let events = Self::load(&path)?;
        tracing::info!(path = %path.display(), events = events.len(), "Opened event store");

        Ok(Self {
            path,
            collection: RwLock::new(Collection::from_events(events)),
        })
    }

    fn load(path: &Path) -> StoreResult<Vec<Event>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut events = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let event = serde_json::from_str::<Event>(line).map_err(|source| {
                StoreError::Corrupt {
                    path: path.to_path_buf(),
                    line: index + 1,
                    source,
                }
            })?;
            events.push(event);
        }

        Ok(events)
    }

    /// Rewrite the file. On a multi-threaded runtime the worker is handed
    /// over with `block_in_place` while the fsync runs.
    fn persist(&self, collection: &Collection) -> StoreResult<()> {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| self.write_file(collection))
            }
            _ => self.write_file(collection),
        }
    }

    fn write_file(&self, collection: &Collection) -> StoreResult<()> {
        let mut lines = Vec::with_capacity(collection.len());
        for event in collection.events() {
            lines.push(serde_json::to_string(event)?);
        }

        atomic_write_with(&self.path, |writer| {
            for line in &lines {
                writeln!(writer, "{}", line)?;
            }
            Ok(())
        })
        .map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Run `op` under the write lock, persisting when it reports a change
    fn mutate<F>(&self, op: F) -> StoreResult<u64>
    where
        F: FnOnce(&mut Collection) -> u64,
    {
        let mut collection = self.collection.write();
        let previous = collection.clone();

        let changed = op(&mut collection);
        if changed > 0 {
            if let Err(e) = self.persist(&collection) {
                *collection = previous;
                return Err(e);
            }
        }

        Ok(changed)
    }
}

#[async_trait]
impl EventStore for JsonlStore {
    async fn insert(&self, event: NewEvent) -> StoreResult<EventId> {
        let mut collection = self.collection.write();
        let previous = collection.clone();

        let id = collection.insert(event);
        if let Err(e) = self.persist(&collection) {
            *collection = previous;
            return Err(e);
        }

        Ok(id)
    }

    async fn find_many(&self, filter: &EventFilter) -> StoreResult<Vec<Event>> {
        Ok(self.collection.read().find_many(filter))
    }

    async fn find_one(&self, id: &EventId) -> StoreResult<Option<Event>> {
        Ok(self.collection.read().find_one(id))
    }

    async fn update_fields(&self, id: &EventId, update: &EventUpdate) -> StoreResult<u64> {
        self.mutate(|c| c.update_fields(id, update))
    }

    async fn add_attendee_if_absent(&self, id: &EventId, email: &str) -> StoreResult<u64> {
        self.mutate(|c| c.add_attendee_if_absent(id, email))
    }

    async fn remove_attendee(&self, id: &EventId, email: &str) -> StoreResult<u64> {
        self.mutate(|c| c.remove_attendee(id, email))
    }

    async fn delete_one(&self, id: &EventId) -> StoreResult<u64> {
        self.mutate(|c| c.delete_one(id))
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.collection.read().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn picnic() -> NewEvent {
        NewEvent {
            title: "Picnic".to_string(),
            event_type: "Outdoor".to_string(),
            created_by: "host@example.com".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = JsonlStore::open(dir.path().join("events.jsonl")).unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_mutations_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");

        let (kept, dropped) = {
            let store = JsonlStore::open(&path).unwrap();
            let kept = store.insert(picnic()).await.unwrap();
            let dropped = store.insert(picnic()).await.unwrap();
            store.add_attendee_if_absent(&kept, "a@example.com").await.unwrap();
            store.delete_one(&dropped).await.unwrap();
            (kept, dropped)
        };

        let store = JsonlStore::open(&path).unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.find_one(&dropped).await.unwrap().is_none());
        let event = store.find_one(&kept).await.unwrap().unwrap();
        assert_eq!(event.attendees, vec!["a@example.com"]);
        assert_eq!(event.created_by, "host@example.com");
    }

    #[tokio::test]
    async fn test_noop_mutation_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");
        let store = JsonlStore::open(&path).unwrap();

        let modified = store
            .remove_attendee(&EventId::generate(), "a@example.com")
            .await
            .unwrap();
        assert_eq!(modified, 0);
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_file_fails_to_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");
        fs::write(&path, "{\"_id\":\"65f1c0ffee65f1c0ffee65f1\",\"title\":\"ok\"}\nnot json\n").unwrap();

        match JsonlStore::open(&path) {
            Err(StoreError::Corrupt { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected corrupt error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back() {
        let dir = TempDir::new().unwrap();
        // A directory in place of the file makes the final rename fail
        let path = dir.path().join("events.jsonl");
        fs::create_dir(&path).unwrap();
        let store = JsonlStore {
            path: path.clone(),
            collection: RwLock::new(Collection::new()),
        };

        assert!(store.insert(picnic()).await.is_err());
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_writes_on_multi_thread_runtime() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");

        let id = {
            let store = JsonlStore::open(&path).unwrap();
            let id = store.insert(picnic()).await.unwrap();
            store.add_attendee_if_absent(&id, "a@example.com").await.unwrap();
            id
        };

        let store = JsonlStore::open(&path).unwrap();
        let event = store.find_one(&id).await.unwrap().unwrap();
        assert_eq!(event.attendees, vec!["a@example.com"]);
    }
}
