//! HTTP DTOs for detective endpoints.
//!
//! These types define the JSON request/response structure for profile and
//! directory endpoints. They serve as the boundary between HTTP and the
//! application layer.

use serde::{Deserialize, Serialize};

use crate::application::{GetDetectiveResult, RankedDetective};
use crate::domain::detective::{Detective, DetectiveLevel, DetectiveStatus};
use crate::domain::entitlements::{effective_badges, EffectiveBadges};
use crate::domain::foundation::Timestamp;
use crate::domain::ranking::ReviewStats;
use crate::domain::subscription::BillingCycle;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to register a new detective profile.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterDetectiveRequest {
    /// Owning user account ID.
    pub user_id: String,
    /// Public business name, optional at registration.
    #[serde(default)]
    pub business_name: Option<String>,
    /// ISO country code the profile operates in.
    pub country: String,
}

/// Query parameters for the public directory listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryQuery {
    /// Restrict to a single country.
    #[serde(default)]
    pub country: Option<String>,
    /// Free-text search against business name and description.
    #[serde(default)]
    pub q: Option<String>,
    /// Requested page size; clamped to the configured maximum.
    #[serde(default)]
    pub limit: Option<u32>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Full detective profile for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct DetectiveResponse {
    pub id: String,
    pub user_id: String,
    pub business_name: Option<String>,
    pub country: String,
    pub city: Option<String>,
    pub description: Option<String>,
    pub status: DetectiveStatus,
    pub level: DetectiveLevel,
    pub subscription_package_id: Option<String>,
    pub billing_cycle: Option<BillingCycle>,
    /// Start of the current period (ISO 8601).
    pub subscription_activated_at: Option<String>,
    /// End of the current period (ISO 8601), absent on the free plan.
    pub subscription_expires_at: Option<String>,
    pub pending_package_id: Option<String>,
    pub pending_billing_cycle: Option<BillingCycle>,
    pub has_blue_tick: bool,
    pub blue_tick_addon: bool,
    pub created_at: String,
}

fn rfc3339(ts: &Timestamp) -> String {
    ts.as_datetime().to_rfc3339()
}

impl From<Detective> for DetectiveResponse {
    fn from(detective: Detective) -> Self {
        Self {
            id: detective.id.to_string(),
            user_id: detective.user_id.to_string(),
            business_name: detective.business_name,
            country: detective.country,
            city: detective.city,
            description: detective.description,
            status: detective.status,
            level: detective.level,
            subscription_package_id: detective.subscription_package_id.map(|id| id.to_string()),
            billing_cycle: detective.billing_cycle,
            subscription_activated_at: detective.subscription_activated_at.as_ref().map(rfc3339),
            subscription_expires_at: detective.subscription_expires_at.as_ref().map(rfc3339),
            pending_package_id: detective.pending_package_id.map(|id| id.to_string()),
            pending_billing_cycle: detective.pending_billing_cycle,
            has_blue_tick: detective.has_blue_tick,
            blue_tick_addon: detective.blue_tick_addon,
            created_at: rfc3339(&detective.created_at),
        }
    }
}

/// Plan summary shown on a profile.
#[derive(Debug, Clone, Serialize)]
pub struct PlanSummaryResponse {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub service_limit: u32,
}

/// Response for a single profile view.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub detective: DetectiveResponse,
    /// Resolved plan, null when even the free plan is missing.
    pub plan: Option<PlanSummaryResponse>,
    /// Badges the profile displays right now.
    pub badges: EffectiveBadges,
    /// Service listings the profile may publish.
    pub service_limit: u32,
    /// Whether a lapsed paid period was reset while serving this request.
    pub downgraded: bool,
}

impl From<GetDetectiveResult> for ProfileResponse {
    fn from(result: GetDetectiveResult) -> Self {
        Self {
            detective: DetectiveResponse::from(result.detective),
            plan: result.plan.map(|plan| PlanSummaryResponse {
                id: plan.id.to_string(),
                name: plan.name,
                display_name: plan.display_name,
                service_limit: plan.service_limit,
            }),
            badges: result.badges,
            service_limit: result.service_limit,
            downgraded: result.downgraded,
        }
    }
}

/// One ranked entry in the public directory.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryEntryResponse {
    pub id: String,
    pub business_name: Option<String>,
    pub country: String,
    pub city: Option<String>,
    pub description: Option<String>,
    pub level: DetectiveLevel,
    pub badges: EffectiveBadges,
    /// Display name of the active plan, if one resolves.
    pub plan_name: Option<String>,
    /// Published review stats, null when the profile has none.
    pub review_stats: Option<ReviewStats>,
    pub score: i64,
    pub rank_position: u32,
    pub is_featured: bool,
}

impl DirectoryEntryResponse {
    /// Maps a ranked entry, resolving display badges at the given instant.
    pub fn from_ranked(entry: RankedDetective, now: &Timestamp) -> Self {
        let badges = effective_badges(&entry.detective, entry.plan.as_ref(), now);

        Self {
            id: entry.detective.id.to_string(),
            business_name: entry.detective.business_name,
            country: entry.detective.country,
            city: entry.detective.city,
            description: entry.detective.description,
            level: entry.detective.level,
            badges,
            plan_name: entry.plan.map(|plan| plan.display_name),
            review_stats: entry.review_stats,
            score: entry.score,
            rank_position: entry.rank_position,
            is_featured: entry.is_featured,
        }
    }
}

/// Response for the public directory listing.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryResponse {
    pub detectives: Vec<DirectoryEntryResponse>,
    /// True when ranking inputs were unavailable and the order fell back to
    /// recency.
    pub degraded: bool,
}
