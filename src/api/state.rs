//! Shared application state

use std::sync::Arc;

use crate::auth::IdentityVerifier;
use crate::service::EventService;

/// Everything a request handler can reach. Built once at startup, after the
/// store is open, so no route is reachable without a data layer.
pub struct AppState {
    /// Event lifecycle operations
    pub events: EventService,

    /// Identity verifier consulted by the auth gate
    pub verifier: Arc<dyn IdentityVerifier>,
}

impl AppState {
    pub fn new(events: EventService, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { events, verifier }
    }
}
