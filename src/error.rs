//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::event_store::EventStoreError;
use crate::jobs::JobError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("No cached analytics for video {0}")]
    NotCached(u64),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] crate::domain::DomainError),

    #[error(transparent)]
    EventStore(#[from] EventStoreError),

    #[error(transparent)]
    Job(#[from] JobError),

    // Server errors (5xx)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            // 404 Not Found
            AppError::NotCached(video_id) => {
                (StatusCode::NOT_FOUND, "not_cached", Some(video_id.to_string()))
            }

            // 400 Bad Request
            AppError::Domain(domain_err) => {
                use crate::domain::DomainError;
                match domain_err {
                    DomainError::InvalidEvent(msg) => {
                        (StatusCode::BAD_REQUEST, "invalid_event", Some(msg.clone()))
                    }
                    DomainError::InvalidDemographics { .. } => {
                        tracing::error!("Demographics misconfigured: {}", domain_err);
                        (StatusCode::INTERNAL_SERVER_ERROR, "invalid_demographics", None)
                    }
                }
            }

            // 503 Service Unavailable
            AppError::EventStore(EventStoreError::CapacityExceeded { capacity }) => {
                tracing::warn!(capacity, "Rejecting event, store at capacity");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "store_capacity_exceeded",
                    Some(capacity.to_string()),
                )
            }

            // 409 Conflict
            AppError::Job(JobError::AlreadyRunning) => {
                (StatusCode::CONFLICT, "batch_already_running", None)
            }

            // 500 Internal Server Error
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::NotCached(1), StatusCode::NOT_FOUND),
            (
                AppError::Domain(DomainError::InvalidEvent("x".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::EventStore(EventStoreError::CapacityExceeded { capacity: 1 }),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (AppError::Job(JobError::AlreadyRunning), StatusCode::CONFLICT),
            (AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
