//! HTTP DTOs for subscription plan endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::plan::{PlanBadges, SubscriptionPlan};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Query parameters for the plan listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPlansParams {
    /// Include plans that can no longer be activated.
    #[serde(default)]
    pub include_inactive: bool,
}

/// Request to create a new plan.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlanRequest {
    /// Stable machine name; immutable after creation.
    pub name: String,
    /// Name shown on pricing pages.
    pub display_name: String,
    pub monthly_price_cents: i64,
    pub yearly_price_cents: i64,
    pub service_limit: u32,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub badges: PlanBadges,
}

/// Request to patch an existing plan. Unset fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlanRequest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub monthly_price_cents: Option<i64>,
    #[serde(default)]
    pub yearly_price_cents: Option<i64>,
    #[serde(default)]
    pub service_limit: Option<u32>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
    #[serde(default)]
    pub badges: Option<PlanBadges>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Full plan view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub monthly_price_cents: i64,
    pub yearly_price_cents: i64,
    pub features: Vec<String>,
    pub badges: PlanBadges,
    pub service_limit: u32,
    pub is_active: bool,
    pub created_at: String,
}

impl From<SubscriptionPlan> for PlanResponse {
    fn from(plan: SubscriptionPlan) -> Self {
        Self {
            id: plan.id.to_string(),
            name: plan.name,
            display_name: plan.display_name,
            monthly_price_cents: plan.monthly_price_cents,
            yearly_price_cents: plan.yearly_price_cents,
            features: plan.features,
            badges: plan.badges,
            service_limit: plan.service_limit,
            is_active: plan.is_active,
            created_at: plan.created_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Response for the plan listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListPlansResponse {
    pub plans: Vec<PlanResponse>,
}
