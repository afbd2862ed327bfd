//! Utility functions and helpers
//!
//! Timestamps and atomic file writes.

pub mod atomic;
pub mod time;

pub use atomic::atomic_write_with;
pub use time::current_timestamp;
