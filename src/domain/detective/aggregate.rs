//! Detective aggregate entity.
//!
//! The Detective aggregate represents a professional investigator profile in
//! the marketplace. Each profile belongs to exactly one user account and
//! carries the subscription state that drives directory ranking and badges.
//!
//! # Design Decisions
//!
//! - **One per user**: Unique constraint on user_id enforced at database level
//! - **Always on a plan**: New profiles get the free plan at registration;
//!   legacy rows with no package are repaired at read time
//! - **Blue tick addon is independent**: `blue_tick_addon` is purchased
//!   separately and survives every plan change; only the `has_blue_tick`
//!   mirror is recomputed from the package

use crate::domain::foundation::{DetectiveId, PlanId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

use super::{DetectiveLevel, DetectiveStatus};
use crate::domain::subscription::BillingCycle;

/// Detective aggregate - a marketplace investigator profile.
///
/// # Invariants
///
/// - `id` is globally unique
/// - `user_id` is unique (one profile per user)
/// - `subscription_package_id` is `None` only on unrepaired legacy rows
/// - `pending_package_id` is only set while a paid period is still running
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detective {
    /// Unique identifier for this profile.
    pub id: DetectiveId,

    /// User account that owns this profile.
    pub user_id: UserId,

    /// Agency or trading name shown in the directory.
    pub business_name: Option<String>,

    /// ISO country code the detective operates from.
    pub country: String,

    /// City the detective operates from.
    pub city: Option<String>,

    /// Free-form profile description.
    pub description: Option<String>,

    /// Moderation status; only Active profiles are listed.
    pub status: DetectiveStatus,

    /// Platform-assigned experience level.
    pub level: DetectiveLevel,

    /// Current subscription plan.
    pub subscription_package_id: Option<PlanId>,

    /// Billing cycle of the current paid period, if any.
    pub billing_cycle: Option<BillingCycle>,

    /// When the current plan took effect.
    pub subscription_activated_at: Option<Timestamp>,

    /// When the current paid period lapses. `None` means no expiry (free plan).
    pub subscription_expires_at: Option<Timestamp>,

    /// Plan to switch to when the current period lapses.
    pub pending_package_id: Option<PlanId>,

    /// Billing cycle for the pending plan switch.
    pub pending_billing_cycle: Option<BillingCycle>,

    /// Package-derived blue tick mirror, recomputed on subscription changes.
    pub has_blue_tick: bool,

    /// When the blue tick was last granted.
    pub blue_tick_activated_at: Option<Timestamp>,

    /// Separately purchased blue tick, independent of the plan.
    pub blue_tick_addon: bool,

    /// Last recorded account activity, maintained by the account layer.
    pub last_active: Option<Timestamp>,

    /// When the profile was created.
    pub created_at: Timestamp,

    /// When the profile was last updated.
    pub updated_at: Timestamp,
}

impl Detective {
    /// Create a new profile at registration.
    ///
    /// New profiles start Pending at Level 1 on the free plan, with no
    /// expiry and no badges beyond what the free plan grants.
    pub fn register(
        id: DetectiveId,
        user_id: UserId,
        business_name: Option<String>,
        country: String,
        free_plan_id: PlanId,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            business_name,
            country,
            city: None,
            description: None,
            status: DetectiveStatus::Pending,
            level: DetectiveLevel::Level1,
            subscription_package_id: Some(free_plan_id),
            billing_cycle: None,
            subscription_activated_at: Some(now),
            subscription_expires_at: None,
            pending_package_id: None,
            pending_billing_cycle: None,
            has_blue_tick: false,
            blue_tick_activated_at: None,
            blue_tick_addon: false,
            last_active: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if a package is assigned and its period has not lapsed.
    ///
    /// A missing expiry counts as unexpired.
    pub fn has_active_package(&self, now: &Timestamp) -> bool {
        self.subscription_package_id.is_some()
            && self
                .subscription_expires_at
                .map_or(true, |expires| expires.is_after(now))
    }

    /// Check if the paid period has strictly lapsed.
    ///
    /// Profiles without an expiry never expire.
    pub fn subscription_expired(&self, now: &Timestamp) -> bool {
        self.subscription_expires_at
            .map_or(false, |expires| expires.is_before(now))
    }

    /// Check if a scheduled plan switch is due to apply.
    pub fn pending_downgrade_due(&self, now: &Timestamp) -> bool {
        self.pending_package_id.is_some()
            && self
                .subscription_expires_at
                .map_or(false, |expires| !expires.is_after(now))
    }

    /// Whole days since the last recorded activity.
    ///
    /// `None` when activity has never been recorded.
    pub fn days_since_active(&self, now: &Timestamp) -> Option<i64> {
        self.last_active.map(|last| now.days_since(&last))
    }

    /// Switch to a new plan, starting its period now.
    ///
    /// Clears any scheduled plan switch; the new period supersedes it.
    pub fn activate_subscription(
        &mut self,
        plan_id: PlanId,
        billing_cycle: Option<BillingCycle>,
        expires_at: Option<Timestamp>,
        now: Timestamp,
    ) {
        self.subscription_package_id = Some(plan_id);
        self.billing_cycle = billing_cycle;
        self.subscription_activated_at = Some(now);
        self.subscription_expires_at = expires_at;
        self.pending_package_id = None;
        self.pending_billing_cycle = None;
        self.updated_at = now;
    }

    /// Drop back to the free plan after the paid period lapsed.
    ///
    /// Clears the billing cycle, the expiry, and any scheduled switch.
    pub fn reset_to_free(&mut self, free_plan_id: PlanId, now: Timestamp) {
        self.subscription_package_id = Some(free_plan_id);
        self.billing_cycle = None;
        self.subscription_activated_at = Some(now);
        self.subscription_expires_at = None;
        self.pending_package_id = None;
        self.pending_billing_cycle = None;
        self.updated_at = now;
    }

    /// Record a plan switch to apply when the current period lapses.
    ///
    /// Pins the period end to `effective_at` so a detective whose expiry was
    /// never materialized still has a concrete date for the switch.
    pub fn schedule_downgrade(
        &mut self,
        plan_id: PlanId,
        billing_cycle: BillingCycle,
        effective_at: Timestamp,
        now: Timestamp,
    ) {
        self.pending_package_id = Some(plan_id);
        self.pending_billing_cycle = Some(billing_cycle);
        self.subscription_expires_at = Some(effective_at);
        self.updated_at = now;
    }
}
