//! Persistence tests for the JSONL event store

use std::fs;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use social_events::auth::Principal;
use social_events::{EventService, EventStatus, EventStore, JsonlStore, StoreError};

#[tokio::test]
async fn test_service_state_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("events.jsonl");
    let host = Principal::new("host@example.com");

    let id = {
        let service = EventService::new(Arc::new(JsonlStore::open(&path).unwrap()));
        let created = service
            .create(&host, json!({"title": "Reunion", "eventType": "Social", "city": "Hanoi"}))
            .await
            .unwrap();
        let id = created.inserted_id.to_string();
        service.join(&host, &id, "a@example.com").await.unwrap();
        service
            .update(&host, &id, json!({"status": "ongoing"}))
            .await
            .unwrap();
        id
    };

    let service = EventService::new(Arc::new(JsonlStore::open(&path).unwrap()));
    let event = service.get(&id).await.unwrap();
    assert_eq!(event.title, "Reunion");
    assert_eq!(event.status, EventStatus::Ongoing);
    assert_eq!(event.attendees, vec!["a@example.com"]);
    assert_eq!(event.details["city"], "Hanoi");
    assert_eq!(event.created_by, "host@example.com");
}

#[tokio::test]
async fn test_one_document_per_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.jsonl");
    let store = JsonlStore::open(&path).unwrap();
    let host = Principal::new("host@example.com");
    let service = EventService::new(Arc::new(store));

    for title in ["One", "Two", "Three"] {
        service.create(&host, json!({ "title": title })).await.unwrap();
    }

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    for line in lines {
        let doc: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(doc["_id"].as_str().unwrap().len(), 24);
        assert_eq!(doc["status"], "upcoming");
    }
}

#[test]
fn test_corrupt_store_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.jsonl");
    fs::write(&path, "{\"_id\":\"short\"}\n").unwrap();

    assert!(matches!(
        JsonlStore::open(&path),
        Err(StoreError::Corrupt { line: 1, .. })
    ));
}

#[tokio::test]
async fn test_concurrent_joins_are_atomic() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonlStore::open(dir.path().join("events.jsonl")).unwrap());
    let service = EventService::new(store.clone());
    let host = Principal::new("host@example.com");

    let id = service
        .create(&host, json!({"title": "Limited workshop"}))
        .await
        .unwrap()
        .inserted_id
        .to_string();

    let mut handles = Vec::new();
    for i in 0..16 {
        let service = service.clone();
        let host = host.clone();
        let id = id.clone();
        // Every email is submitted twice concurrently
        let email = format!("user{}@example.com", i % 8);
        handles.push(tokio::spawn(async move {
            service.join(&host, &id, &email).await.is_ok()
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap() {
            successes += 1;
        }
    }

    assert_eq!(successes, 8);
    let event = service.get(&id).await.unwrap();
    assert_eq!(event.attendees.len(), 8);
    assert_eq!(store.count().await.unwrap(), 1);
}
