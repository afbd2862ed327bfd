//! Time and timestamp utilities

use chrono::Utc;

/// Get current Unix timestamp in seconds
pub fn current_timestamp() -> u64 {
    Utc::now().timestamp().max(0) as u64
}
