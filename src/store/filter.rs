//! Conjunctive event filters

use crate::types::{Event, EventStatus};

/// Every present condition must hold
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    /// Case-insensitive substring of the title
    pub title_contains: Option<String>,
    /// Exact event type
    pub event_type: Option<String>,
    /// Exact status
    pub status: Option<EventStatus>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, needle: impl Into<String>) -> Self {
        self.title_contains = Some(needle.into());
        self
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, event: &Event) -> bool {
        if let Some(ref needle) = self.title_contains {
            if !event.title.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if let Some(ref event_type) = self.event_type {
            if &event.event_type != event_type {
                return false;
            }
        }
        if let Some(status) = self.status {
            if event.status != status {
                return false;
            }
        }
        true
    }
}
