//! Data types for the social events service
//!
//! This module contains the event document, its status and identifier types.

mod event;
mod id;
mod status;

pub use event::{Event, EventUpdate, NewEvent};
pub use id::{EventId, InvalidEventId};
pub use status::EventStatus;

/// Check if value is zero (for skip_serializing_if)
pub fn is_zero(val: &u64) -> bool {
    *val == 0
}
