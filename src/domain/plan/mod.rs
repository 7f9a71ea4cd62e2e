//! Subscription plan domain module.
//!
//! # Module Structure
//!
//! - `plan` - SubscriptionPlan entity
//! - `badges` - PlanBadges flags and their stored encodings

mod badges;
mod plan;

pub use badges::PlanBadges;
pub use plan::SubscriptionPlan;
