//! API error type shared by all HTTP areas.
//!
//! Every route handler returns `Result<_, ApiError>`; the status mapping
//! from domain error codes lives here and nowhere else.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::subscription::SubscriptionError;

/// JSON error body returned for all failed requests.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }
}

/// API error that converts domain errors to HTTP responses.
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<SubscriptionError> for ApiError {
    fn from(err: SubscriptionError) -> Self {
        Self(err.into())
    }
}

fn status_for(code: ErrorCode) -> (StatusCode, &'static str) {
    match code {
        ErrorCode::ValidationFailed => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
        ErrorCode::EmptyField => (StatusCode::BAD_REQUEST, "EMPTY_FIELD"),
        ErrorCode::OutOfRange => (StatusCode::BAD_REQUEST, "OUT_OF_RANGE"),
        ErrorCode::InvalidFormat => (StatusCode::BAD_REQUEST, "INVALID_FORMAT"),
        ErrorCode::InvalidBillingCycle => (StatusCode::BAD_REQUEST, "INVALID_BILLING_CYCLE"),
        ErrorCode::InvalidStatus => (StatusCode::BAD_REQUEST, "INVALID_STATUS"),
        ErrorCode::DetectiveNotFound => (StatusCode::NOT_FOUND, "DETECTIVE_NOT_FOUND"),
        ErrorCode::PlanNotFound => (StatusCode::NOT_FOUND, "PLAN_NOT_FOUND"),
        ErrorCode::UserNotFound => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
        ErrorCode::PlanInactive => (StatusCode::CONFLICT, "PLAN_INACTIVE"),
        ErrorCode::NoFreePlan => (StatusCode::INTERNAL_SERVER_ERROR, "NO_FREE_PLAN"),
        ErrorCode::DatabaseError => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
        ErrorCode::InternalError => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = status_for(self.0.code);

        let details = if self.0.details.is_empty() {
            None
        } else {
            serde_json::to_value(&self.0.details).ok()
        };

        let body = ErrorResponse {
            error_code: error_code.to_string(),
            message: self.0.message,
            details,
        };

        (status, Json(body)).into_response()
    }
}
