//! Entitlements domain module.
//!
//! What a subscription currently grants: displayed badges and service
//! listing limits.
//!
//! # Module Structure
//!
//! - `resolve` - effective badge and service limit resolution
//! - `reason` - EntitlementReason sync triggers

mod reason;
mod resolve;

pub use reason::EntitlementReason;
pub use resolve::{
    effective_badges, service_limit_for, subscription_active, EffectiveBadges,
    DEFAULT_SERVICE_LIMIT,
};
