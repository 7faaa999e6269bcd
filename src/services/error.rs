//! Error types for the service layer.

use crate::db::repository::RepositoryError;

/// Result type for service operations
pub type SchedulingResult<T> = Result<T, SchedulingError>;

/// Error type for scheduling operations.
///
/// Validation and transition errors are final and must not be retried.
/// `Repository(ConnectionError)` is retry-safe on reads; after a failed
/// write the caller must re-fetch state before retrying, because the
/// outcome of the interrupted write is unknown.
#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Not reschedulable: {0}")]
    NotReschedulable(String),

    #[error("Not cancellable: {0}")]
    NotCancellable(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payment failed: {0}")]
    Payment(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl SchedulingError {
    /// Shorthand for transition failures.
    pub fn transition(from: impl ToString, to: impl ToString) -> Self {
        SchedulingError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
