//! Attendance state machine
//!
//! Per (event, email): NotAttending --join--> Attending --cancel--> NotAttending.
//! Both transitions read for existence first so a missing event is a
//! `NotFound`, then apply the store's atomic conditional mutation. A zero
//! modified count after that means the pair was already in the target state,
//! which is reported rather than ignored.

use serde_json::Value;

use crate::auth::Principal;
use crate::types::EventId;

use super::payload;
use super::{EventError, EventResult, EventService, OperationMessage};

async fn ensure_exists(service: &EventService, id: &EventId) -> EventResult<()> {
    match service.store.find_one(id).await? {
        Some(_) => Ok(()),
        None => Err(EventError::not_found(id)),
    }
}

pub(super) async fn join(
    service: &EventService,
    principal: &Principal,
    id: &EventId,
    email: &str,
) -> EventResult<OperationMessage> {
    ensure_exists(service, id).await?;

    if service.store.add_attendee_if_absent(id, email).await? == 0 {
        return Err(EventError::invalid(format!(
            "'{}' has already joined this event",
            email
        )));
    }

    tracing::info!(event_id = %id, attendee = %email, by = %principal.email, "Attendee joined");
    Ok(OperationMessage::new("Joined event successfully"))
}

pub(super) async fn cancel(
    service: &EventService,
    principal: &Principal,
    id: &str,
    body: Value,
) -> EventResult<OperationMessage> {
    let id = payload::parse_id(id)?;
    let email = payload::parse_cancel(body)?;
    ensure_exists(service, &id).await?;

    if service.store.remove_attendee(&id, &email).await? == 0 {
        return Err(EventError::invalid(format!(
            "'{}' is not attending this event",
            email
        )));
    }

    tracing::info!(event_id = %id, attendee = %email, by = %principal.email, "Attendance cancelled");
    Ok(OperationMessage::new("Attendance cancelled successfully"))
}
