//! Event status

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of an event. New events are always `Upcoming`;
/// the other values are only reachable by an explicit update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(EventStatus::Upcoming),
            "ongoing" => Ok(EventStatus::Ongoing),
            "completed" => Ok(EventStatus::Completed),
            "cancelled" => Ok(EventStatus::Cancelled),
            other => Err(format!(
                "unknown status '{}': expected upcoming, ongoing, completed or cancelled",
                other
            )),
        }
    }
}
