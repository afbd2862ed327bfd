//! Event documents

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{is_zero, EventId, EventStatus};

/// A social event as stored and served
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: EventId,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "eventType", default)]
    pub event_type: String,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(rename = "createdBy", default, skip_serializing_if = "String::is_empty")]
    pub created_by: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "is_zero")]
    pub created_at: u64,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "is_zero")]
    pub updated_at: u64,
    /// Free-form descriptive fields supplied by the creator (date, location, ...)
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Event {
    /// Materialize a new event under a store-assigned id
    pub fn from_new(id: EventId, new: NewEvent, now: u64) -> Self {
        Self {
            id,
            title: new.title,
            event_type: new.event_type,
            status: EventStatus::Upcoming,
            attendees: Vec::new(),
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
            details: new.details,
        }
    }

    pub fn is_attending(&self, email: &str) -> bool {
        self.attendees.iter().any(|a| a == email)
    }

    /// Overwrite the fields named by `update`, leaving everything else alone
    pub fn apply(&mut self, update: &EventUpdate) {
        if let Some(ref title) = update.title {
            self.title = title.clone();
        }
        if let Some(ref event_type) = update.event_type {
            self.event_type = event_type.clone();
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        for (key, value) in &update.details {
            self.details.insert(key.clone(), value.clone());
        }
    }
}

/// Creation payload after server-side sanitizing.
///
/// Has no status or attendee fields: those are always initialized by the
/// store as `upcoming` and empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub event_type: String,
    pub created_by: String,
    pub details: Map<String, Value>,
}

/// Named-field replacement for an existing event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub event_type: Option<String>,
    pub status: Option<EventStatus>,
    pub details: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Event {
        let mut details = Map::new();
        details.insert("location".to_string(), json!("Riverside Park"));
        Event::from_new(
            EventId::parse("65f1c0ffee65f1c0ffee65f1").unwrap(),
            NewEvent {
                title: "Summer Picnic".to_string(),
                event_type: "Outdoor".to_string(),
                created_by: "host@example.com".to_string(),
                details,
            },
            1_700_000_000,
        )
    }

    #[test]
    fn test_new_event_defaults() {
        let event = sample();
        assert_eq!(event.status, EventStatus::Upcoming);
        assert!(event.attendees.is_empty());
        assert_eq!(event.created_at, event.updated_at);
    }

    #[test]
    fn test_wire_format() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["_id"], "65f1c0ffee65f1c0ffee65f1");
        assert_eq!(value["eventType"], "Outdoor");
        assert_eq!(value["status"], "upcoming");
        assert_eq!(value["attendees"], json!([]));
        assert_eq!(value["createdBy"], "host@example.com");
        // Details are flattened next to the typed fields
        assert_eq!(value["location"], "Riverside Park");

        let back: Event = serde_json::from_value(value).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_apply_touches_only_named_fields() {
        let mut event = sample();
        let mut details = Map::new();
        details.insert("capacity".to_string(), json!(40));
        event.apply(&EventUpdate {
            title: Some("Autumn Picnic".to_string()),
            details,
            ..Default::default()
        });

        assert_eq!(event.title, "Autumn Picnic");
        assert_eq!(event.event_type, "Outdoor");
        assert_eq!(event.details["location"], "Riverside Park");
        assert_eq!(event.details["capacity"], 40);
    }
}
