//! Opaque event identifiers
//!
//! Ids use the 12-byte object id layout of the document store the service
//! was first deployed against, rendered as 24 lowercase hex characters:
//! 4-byte big-endian seconds, 5 process-random bytes, 3-byte counter.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::utils::time::current_timestamp;

const ID_BYTES: usize = 12;

static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: OnceLock<AtomicU32> = OnceLock::new();

/// Rejected identifier text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid event id '{0}': expected 24 hexadecimal characters")]
pub struct InvalidEventId(pub String);

/// Store-assigned event key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId([u8; ID_BYTES]);

impl EventId {
    /// Generate a fresh id
    pub fn generate() -> Self {
        let seconds = current_timestamp() as u32;
        let unique = PROCESS_UNIQUE.get_or_init(rand::random::<[u8; 5]>);
        let counter = COUNTER
            .get_or_init(|| AtomicU32::new(rand::random::<u32>()))
            .fetch_add(1, Ordering::SeqCst);

        let mut bytes = [0u8; ID_BYTES];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(unique);
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Parse the 24-character hex form
    pub fn parse(text: &str) -> Result<Self, InvalidEventId> {
        let mut bytes = [0u8; ID_BYTES];
        hex::decode_to_slice(text, &mut bytes).map_err(|_| InvalidEventId(text.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for EventId {
    type Err = InvalidEventId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for EventId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
