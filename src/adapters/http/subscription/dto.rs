//! HTTP DTOs for subscription administration endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{PendingDowngradeReport, SweepReport};
use crate::domain::detective::Detective;
use crate::domain::subscription::BillingCycle;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to activate a plan on a profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivateSubscriptionRequest {
    pub plan_id: Uuid,
    /// "monthly" or "yearly"; anything else is rejected with a 400.
    pub billing_cycle: String,
}

/// Request to schedule a downgrade to a cheaper plan.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleDowngradeRequest {
    pub plan_id: Uuid,
    pub billing_cycle: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Subscription columns of a profile after a state change.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionStateResponse {
    pub detective_id: String,
    pub package_id: Option<String>,
    pub billing_cycle: Option<BillingCycle>,
    /// Start of the current period (ISO 8601).
    pub activated_at: Option<String>,
    /// End of the current period (ISO 8601), absent on the free plan.
    pub expires_at: Option<String>,
    pub pending_package_id: Option<String>,
    pub pending_billing_cycle: Option<BillingCycle>,
    pub has_blue_tick: bool,
}

impl From<&Detective> for SubscriptionStateResponse {
    fn from(detective: &Detective) -> Self {
        Self {
            detective_id: detective.id.to_string(),
            package_id: detective.subscription_package_id.map(|id| id.to_string()),
            billing_cycle: detective.billing_cycle,
            activated_at: detective
                .subscription_activated_at
                .as_ref()
                .map(|ts| ts.as_datetime().to_rfc3339()),
            expires_at: detective
                .subscription_expires_at
                .as_ref()
                .map(|ts| ts.as_datetime().to_rfc3339()),
            pending_package_id: detective.pending_package_id.map(|id| id.to_string()),
            pending_billing_cycle: detective.pending_billing_cycle,
            has_blue_tick: detective.has_blue_tick,
        }
    }
}

/// Response for a subscription activation.
#[derive(Debug, Clone, Serialize)]
pub struct ActivateSubscriptionResponse {
    pub subscription: SubscriptionStateResponse,
    /// True when the same plan was re-activated (a renewal).
    pub renewed: bool,
}

/// Response for a downgrade request.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleDowngradeResponse {
    pub subscription: SubscriptionStateResponse,
    /// True when the switch happened now instead of being booked.
    pub applied_immediately: bool,
    /// When the booked switch takes effect (ISO 8601).
    pub effective_at: String,
}

/// Response for a triggered expiry sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepResponse {
    pub checked: u32,
    pub downgraded: u32,
    pub errors: Vec<String>,
}

impl From<SweepReport> for SweepResponse {
    fn from(report: SweepReport) -> Self {
        Self {
            checked: report.checked,
            downgraded: report.downgraded,
            errors: report.errors,
        }
    }
}

/// Response for a triggered pending-downgrade pass.
#[derive(Debug, Clone, Serialize)]
pub struct PendingDowngradesResponse {
    pub checked: u32,
    pub applied: u32,
    pub errors: Vec<String>,
}

impl From<PendingDowngradeReport> for PendingDowngradesResponse {
    fn from(report: PendingDowngradeReport) -> Self {
        Self {
            checked: report.checked,
            applied: report.applied,
            errors: report.errors,
        }
    }
}
