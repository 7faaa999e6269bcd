//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::services::SchedulingError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request shape, before the service layer was reached
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Domain failure from the service layer
    Scheduling(SchedulingError),
}

impl AppError {
    /// Status code and stable error code for a service-layer failure.
    fn classify(err: &SchedulingError) -> (StatusCode, &'static str) {
        match err {
            SchedulingError::InvalidRange(_) => (StatusCode::BAD_REQUEST, "INVALID_RANGE"),
            SchedulingError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            SchedulingError::InvalidPrice(_) => (StatusCode::BAD_REQUEST, "INVALID_PRICE"),
            SchedulingError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            SchedulingError::SlotUnavailable(_) => (StatusCode::CONFLICT, "SLOT_UNAVAILABLE"),
            SchedulingError::InvalidTransition { .. } => {
                (StatusCode::CONFLICT, "INVALID_TRANSITION")
            }
            SchedulingError::NotReschedulable(_) => (StatusCode::CONFLICT, "NOT_RESCHEDULABLE"),
            SchedulingError::NotCancellable(_) => (StatusCode::CONFLICT, "NOT_CANCELLABLE"),
            SchedulingError::Payment(_) => (StatusCode::PAYMENT_REQUIRED, "PAYMENT_DECLINED"),
            SchedulingError::Repository(repo) => match repo {
                RepositoryError::ConnectionError(_) => {
                    (StatusCode::BAD_GATEWAY, "STORAGE_UNAVAILABLE")
                }
                RepositoryError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                RepositoryError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "REPOSITORY_ERROR"),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg)),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Scheduling(err) => {
                let (status, code) = Self::classify(&err);
                (status, ApiError::new(code, err.to_string()))
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        AppError::Scheduling(err)
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Scheduling(SchedulingError::Repository(err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
