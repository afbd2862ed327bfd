//! Create, list, get, update and delete

use serde_json::Value;

use crate::auth::Principal;
use crate::store::EventFilter;
use crate::types::{Event, EventStatus};

use super::payload::{self, Patch};
use super::{
    attendance, CreatedEvent, EventError, EventQuery, EventResult, EventService, OperationMessage,
};

/// Sentinel event type meaning "no type filter"
const ALL_TYPES: &str = "All";

/// Insert a new upcoming event with no attendees, owned by `principal`
pub(super) async fn create(
    service: &EventService,
    principal: &Principal,
    body: Value,
) -> EventResult<CreatedEvent> {
    let new = payload::parse_new_event(body, &principal.email)?;
    let id = service.store.insert(new).await?;

    tracing::info!(event_id = %id, created_by = %principal.email, "Event created");
    Ok(CreatedEvent {
        message: "Event created successfully".to_string(),
        inserted_id: id,
    })
}

/// Upcoming events only, optionally narrowed by title text and type
pub(super) async fn list(service: &EventService, query: &EventQuery) -> EventResult<Vec<Event>> {
    let mut filter = EventFilter::new().with_status(EventStatus::Upcoming);

    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        filter = filter.with_title(search);
    }
    if let Some(event_type) = query
        .event_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty() && *t != ALL_TYPES)
    {
        filter = filter.with_event_type(event_type);
    }

    Ok(service.store.find_many(&filter).await?)
}

pub(super) async fn get(service: &EventService, id: &str) -> EventResult<Event> {
    let id = payload::parse_id(id)?;
    service
        .store
        .find_one(&id)
        .await?
        .ok_or_else(|| EventError::not_found(&id))
}

pub(super) async fn update(
    service: &EventService,
    principal: &Principal,
    id: &str,
    body: Value,
) -> EventResult<OperationMessage> {
    let id = payload::parse_id(id)?;

    match payload::parse_patch(body)? {
        Patch::Join(email) => attendance::join(service, principal, &id, &email).await,
        Patch::Update(update) => {
            if service.store.update_fields(&id, &update).await? == 0 {
                return Err(EventError::not_found(&id));
            }
            tracing::info!(event_id = %id, by = %principal.email, "Event updated");
            Ok(OperationMessage::new("Event updated successfully"))
        }
    }
}

/// Hard delete; there is no tombstone
pub(super) async fn delete(
    service: &EventService,
    principal: &Principal,
    id: &str,
) -> EventResult<OperationMessage> {
    let id = payload::parse_id(id)?;

    if service.store.delete_one(&id).await? == 0 {
        return Err(EventError::not_found(&id));
    }
    tracing::info!(event_id = %id, by = %principal.email, "Event deleted");
    Ok(OperationMessage::new("Event deleted successfully"))
}
