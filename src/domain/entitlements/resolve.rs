//! Effective badge resolution.
//!
//! Badges shown on a profile are derived at read time from the subscription
//! state and the plan's badge flags. Only the `has_blue_tick` mirror column
//! is ever persisted; everything else is computed on demand.

use serde::{Deserialize, Serialize};

use crate::domain::detective::Detective;
use crate::domain::foundation::Timestamp;
use crate::domain::plan::SubscriptionPlan;

/// Service listings allowed when no active plan resolves.
pub const DEFAULT_SERVICE_LIMIT: u32 = 2;

/// The badges a profile actually displays right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveBadges {
    pub blue_tick: bool,
    pub pro: bool,
    pub recommended: bool,
}

/// Whether the subscription currently grants its package badges.
///
/// A subscription is active when a package is assigned and either the plan
/// is free (free never expires, whatever the expiry column says), no expiry
/// is set, or the expiry is in the future.
pub fn subscription_active(
    detective: &Detective,
    plan: Option<&SubscriptionPlan>,
    now: &Timestamp,
) -> bool {
    if detective.subscription_package_id.is_none() {
        return false;
    }
    if plan.map_or(false, |p| p.is_free()) {
        return true;
    }
    detective
        .subscription_expires_at
        .map_or(true, |expires| expires.is_after(now))
}

/// Resolves the badges a profile displays.
///
/// `blue_tick` is granted by the separately purchased addon OR by an active
/// subscription whose plan carries the badge; the addon survives every plan
/// change. `pro` and `recommended` come only from an active subscription.
/// Total function: missing inputs resolve to no badges.
pub fn effective_badges(
    detective: &Detective,
    plan: Option<&SubscriptionPlan>,
    now: &Timestamp,
) -> EffectiveBadges {
    let active = subscription_active(detective, plan, now);
    let package_badges = plan.map(|p| p.badges).unwrap_or_default();

    EffectiveBadges {
        blue_tick: detective.blue_tick_addon || (active && package_badges.blue_tick),
        pro: active && package_badges.pro,
        recommended: active && package_badges.recommended,
    }
}

/// Resolves how many service listings the profile may publish.
///
/// Falls back to [`DEFAULT_SERVICE_LIMIT`] when the plan is missing,
/// deactivated, or the subscription has lapsed.
pub fn service_limit_for(
    detective: &Detective,
    plan: Option<&SubscriptionPlan>,
    now: &Timestamp,
) -> u32 {
    match plan {
        Some(plan) if plan.is_active && subscription_active(detective, Some(plan), now) => {
            plan.service_limit
        }
        _ => DEFAULT_SERVICE_LIMIT,
    }
}
