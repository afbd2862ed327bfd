//! In-process event collection shared by the store backends
//!
//! Plain data with no locking of its own; each backend wraps it in a
//! `RwLock` and runs one method per lock acquisition.

use crate::types::{Event, EventId, EventUpdate, NewEvent};
use crate::utils::time::current_timestamp;

use super::EventFilter;

/// Ordered collection of events (insertion order)
#[derive(Debug, Clone, Default)]
pub struct Collection {
    events: Vec<Event>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn position(&self, id: &EventId) -> Option<usize> {
        self.events.iter().position(|e| &e.id == id)
    }

    fn get_mut(&mut self, id: &EventId) -> Option<&mut Event> {
        self.events.iter_mut().find(|e| &e.id == id)
    }

    pub fn insert(&mut self, new: NewEvent) -> EventId {
        let mut id = EventId::generate();
        while self.position(&id).is_some() {
            id = EventId::generate();
        }
        self.events.push(Event::from_new(id, new, current_timestamp()));
        id
    }

    pub fn find_many(&self, filter: &EventFilter) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect()
    }

    pub fn find_one(&self, id: &EventId) -> Option<Event> {
        self.events.iter().find(|e| &e.id == id).cloned()
    }

    /// Returns the matched count
    pub fn update_fields(&mut self, id: &EventId, update: &EventUpdate) -> u64 {
        match self.get_mut(id) {
            Some(event) => {
                event.apply(update);
                event.updated_at = current_timestamp();
                1
            }
            None => 0,
        }
    }

    /// Returns the modified count
    pub fn add_attendee_if_absent(&mut self, id: &EventId, email: &str) -> u64 {
        match self.get_mut(id) {
            Some(event) if !event.is_attending(email) => {
                event.attendees.push(email.to_string());
                event.updated_at = current_timestamp();
                1
            }
            _ => 0,
        }
    }

    /// Returns the modified count
    pub fn remove_attendee(&mut self, id: &EventId, email: &str) -> u64 {
        match self.get_mut(id) {
            Some(event) if event.is_attending(email) => {
                event.attendees.retain(|a| a != email);
                event.updated_at = current_timestamp();
                1
            }
            _ => 0,
        }
    }

    /// Returns the deleted count
    pub fn delete_one(&mut self, id: &EventId) -> u64 {
        match self.position(id) {
            Some(index) => {
                self.events.remove(index);
                1
            }
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventStatus;

    fn new_event(title: &str) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            event_type: "Social".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_assigns_defaults() {
        let mut collection = Collection::new();
        let id = collection.insert(new_event("Meetup"));

        let event = collection.find_one(&id).unwrap();
        assert_eq!(event.status, EventStatus::Upcoming);
        assert!(event.attendees.is_empty());
        assert!(event.created_at > 0);
    }

    #[test]
    fn test_add_attendee_is_conditional() {
        let mut collection = Collection::new();
        let id = collection.insert(new_event("Meetup"));

        assert_eq!(collection.add_attendee_if_absent(&id, "a@example.com"), 1);
        assert_eq!(collection.add_attendee_if_absent(&id, "a@example.com"), 0);
        assert_eq!(collection.add_attendee_if_absent(&id, "b@example.com"), 1);

        let event = collection.find_one(&id).unwrap();
        assert_eq!(event.attendees, vec!["a@example.com", "b@example.com"]);
    }

    #[test]
    fn test_add_attendee_unknown_id() {
        let mut collection = Collection::new();
        assert_eq!(
            collection.add_attendee_if_absent(&EventId::generate(), "a@example.com"),
            0
        );
    }

    #[test]
    fn test_remove_attendee() {
        let mut collection = Collection::new();
        let id = collection.insert(new_event("Meetup"));
        collection.add_attendee_if_absent(&id, "a@example.com");

        assert_eq!(collection.remove_attendee(&id, "b@example.com"), 0);
        assert_eq!(collection.remove_attendee(&id, "a@example.com"), 1);
        assert_eq!(collection.remove_attendee(&id, "a@example.com"), 0);
        assert!(collection.find_one(&id).unwrap().attendees.is_empty());
    }

    #[test]
    fn test_update_fields_reports_matched() {
        let mut collection = Collection::new();
        let id = collection.insert(new_event("Meetup"));
        let update = EventUpdate {
            status: Some(EventStatus::Completed),
            ..Default::default()
        };

        assert_eq!(collection.update_fields(&id, &update), 1);
        assert_eq!(collection.update_fields(&EventId::generate(), &update), 0);
        assert_eq!(
            collection.find_one(&id).unwrap().status,
            EventStatus::Completed
        );
    }

    #[test]
    fn test_delete_one() {
        let mut collection = Collection::new();
        let id = collection.insert(new_event("Meetup"));

        assert_eq!(collection.delete_one(&id), 1);
        assert_eq!(collection.delete_one(&id), 0);
        assert!(collection.is_empty());
    }

    #[test]
    fn test_find_many_keeps_insertion_order() {
        let mut collection = Collection::new();
        collection.insert(new_event("First"));
        collection.insert(new_event("Second"));
        collection.insert(new_event("Third"));

        let titles: Vec<String> = collection
            .find_many(&EventFilter::new())
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }
}
