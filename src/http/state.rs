//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::external::{AuthTokenProvider, PaymentAuthorizer};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn FullRepository>,
    /// Source of the bearer token attached to outbound collaborator calls
    pub auth: Arc<dyn AuthTokenProvider>,
    /// Payment authorizer consulted before paid bookings
    pub payments: Arc<dyn PaymentAuthorizer>,
}

impl AppState {
    /// Create a new application state with the given collaborators.
    pub fn new(
        repository: Arc<dyn FullRepository>,
        auth: Arc<dyn AuthTokenProvider>,
        payments: Arc<dyn PaymentAuthorizer>,
    ) -> Self {
        Self {
            repository,
            auth,
            payments,
        }
    }
}
