//! Subscription-specific error types.
//!
//! Errors related to plan activation, scheduled downgrades, and expiry
//! processing.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | DetectiveNotFound | 404 |
//! | PlanNotFound | 404 |
//! | PlanInactive | 409 |
//! | NoFreePlan | 500 |
//! | InvalidBillingCycle | 400 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DetectiveId, DomainError, ErrorCode, PlanId};

/// Subscription-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// Detective profile was not found.
    DetectiveNotFound(DetectiveId),

    /// Subscription plan was not found.
    PlanNotFound(PlanId),

    /// Plan exists but is not open for activation.
    PlanInactive { name: String },

    /// No active zero-price plan is configured.
    ///
    /// The platform cannot assign subscriptions without one; this is a
    /// deployment fault, not a user error.
    NoFreePlan,

    /// Billing cycle string was not recognized.
    InvalidBillingCycle(String),

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl SubscriptionError {
    pub fn detective_not_found(id: DetectiveId) -> Self {
        SubscriptionError::DetectiveNotFound(id)
    }

    pub fn plan_not_found(id: PlanId) -> Self {
        SubscriptionError::PlanNotFound(id)
    }

    pub fn plan_inactive(name: impl Into<String>) -> Self {
        SubscriptionError::PlanInactive { name: name.into() }
    }

    pub fn no_free_plan() -> Self {
        SubscriptionError::NoFreePlan
    }

    pub fn invalid_billing_cycle(value: impl Into<String>) -> Self {
        SubscriptionError::InvalidBillingCycle(value.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SubscriptionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        SubscriptionError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SubscriptionError::DetectiveNotFound(_) => ErrorCode::DetectiveNotFound,
            SubscriptionError::PlanNotFound(_) => ErrorCode::PlanNotFound,
            SubscriptionError::PlanInactive { .. } => ErrorCode::PlanInactive,
            SubscriptionError::NoFreePlan => ErrorCode::NoFreePlan,
            SubscriptionError::InvalidBillingCycle(_) => ErrorCode::InvalidBillingCycle,
            SubscriptionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            SubscriptionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            SubscriptionError::DetectiveNotFound(id) => {
                format!("Detective not found: {}", id)
            }
            SubscriptionError::PlanNotFound(id) => format!("Subscription plan not found: {}", id),
            SubscriptionError::PlanInactive { name } => {
                format!("Subscription plan '{}' is not active", name)
            }
            SubscriptionError::NoFreePlan => {
                "No active free plan is configured".to_string()
            }
            SubscriptionError::InvalidBillingCycle(value) => {
                format!("Invalid billing cycle: {}", value)
            }
            SubscriptionError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            SubscriptionError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubscriptionError::Infrastructure(_))
    }
}

impl std::fmt::Display for SubscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SubscriptionError {}

impl From<DomainError> for SubscriptionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::NoFreePlan => SubscriptionError::NoFreePlan,
            ErrorCode::PlanInactive => SubscriptionError::PlanInactive {
                name: err.to_string(),
            },
            ErrorCode::InvalidBillingCycle => {
                SubscriptionError::InvalidBillingCycle(err.to_string())
            }
            ErrorCode::ValidationFailed => SubscriptionError::ValidationFailed {
                field: "unknown".to_string(),
                message: err.to_string(),
            },
            _ => SubscriptionError::Infrastructure(err.to_string()),
        }
    }
}

impl From<SubscriptionError> for DomainError {
    fn from(err: SubscriptionError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
