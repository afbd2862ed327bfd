//! Request body validation
//!
//! Turns loosely shaped JSON bodies into typed store inputs, enforcing which
//! fields a client may set.

use serde_json::{Map, Value};

use crate::types::{EventId, EventStatus, EventUpdate, NewEvent};

use super::{EventError, EventResult};

/// Fields the server owns; silently dropped from creation payloads
pub(crate) const SERVER_FIELDS: &[&str] = &[
    "_id",
    "id",
    "status",
    "attendees",
    "createdBy",
    "createdAt",
    "updatedAt",
];

/// Fields a general update may never touch
pub const PROTECTED_FIELDS: &[&str] = &["_id", "id", "attendees", "createdBy", "createdAt", "updatedAt"];

/// What a `PATCH /events/:id` body asks for
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Patch {
    Join(String),
    Update(EventUpdate),
}

pub(crate) fn parse_id(id: &str) -> EventResult<EventId> {
    EventId::parse(id.trim()).map_err(|e| EventError::invalid(e.to_string()))
}

/// Trimmed, minimally well-formed email (`local@domain`, no whitespace)
pub(crate) fn parse_email(email: &str) -> EventResult<String> {
    let email = email.trim();
    if email.is_empty() {
        return Err(EventError::invalid("email is required"));
    }

    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !well_formed {
        return Err(EventError::invalid(format!("invalid email '{}'", email)));
    }

    Ok(email.to_string())
}

fn into_object(body: Value) -> EventResult<Map<String, Value>> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(EventError::invalid("request body must be a JSON object")),
    }
}

fn string_field(name: &str, value: Value) -> EventResult<String> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(EventError::invalid(format!("{} must be a string", name))),
    }
}

/// Creation payload: server-owned fields are dropped, everything else kept
pub(crate) fn parse_new_event(body: Value, created_by: &str) -> EventResult<NewEvent> {
    let mut fields = into_object(body)?;
    for name in SERVER_FIELDS {
        fields.remove(*name);
    }

    let title = match fields.remove("title") {
        None | Some(Value::Null) => String::new(),
        Some(value) => string_field("title", value)?,
    };
    let event_type = match fields.remove("eventType") {
        None | Some(Value::Null) => String::new(),
        Some(value) => string_field("eventType", value)?,
    };

    Ok(NewEvent {
        title,
        event_type,
        created_by: created_by.to_string(),
        details: fields,
    })
}

/// `{email}` joins; any other non-empty set of fields is an update
pub(crate) fn parse_patch(body: Value) -> EventResult<Patch> {
    let mut fields = into_object(body)?;

    if let Some(email) = fields.remove("email") {
        if !fields.is_empty() {
            return Err(EventError::invalid(
                "email cannot be combined with other fields",
            ));
        }
        let email = string_field("email", email)?;
        return Ok(Patch::Join(parse_email(&email)?));
    }

    if fields.is_empty() {
        return Err(EventError::invalid("no fields to update"));
    }

    if let Some(name) = PROTECTED_FIELDS.iter().find(|f| fields.contains_key(**f)) {
        return Err(EventError::invalid(format!(
            "field '{}' cannot be updated",
            name
        )));
    }

    let mut update = EventUpdate::default();
    if let Some(value) = fields.remove("title") {
        update.title = Some(string_field("title", value)?);
    }
    if let Some(value) = fields.remove("eventType") {
        update.event_type = Some(string_field("eventType", value)?);
    }
    if let Some(value) = fields.remove("status") {
        let status = string_field("status", value)?
            .parse::<EventStatus>()
            .map_err(EventError::InvalidInput)?;
        update.status = Some(status);
    }
    update.details = fields;

    Ok(Patch::Update(update))
}

/// Cancel body must name the attendee
pub(crate) fn parse_cancel(body: Value) -> EventResult<String> {
    let mut fields = into_object(body)?;
    match fields.remove("email") {
        Some(value) => parse_email(&string_field("email", value)?),
        None => Err(EventError::invalid("email is required")),
    }
}
