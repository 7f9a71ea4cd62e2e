//! Subscription handlers.
//!
//! Command handlers for the paid-plan lifecycle including:
//!
//! - Activating a plan after verified payment
//! - Booking a downgrade for the period end
//! - Applying booked downgrades once due
//! - Sweeping lapsed paid periods back to the free plan

mod activate_subscription;
mod apply_pending_downgrade;
mod expire_subscriptions;
mod schedule_downgrade;

pub use activate_subscription::{
    ActivateSubscriptionCommand, ActivateSubscriptionHandler, ActivateSubscriptionResult,
};
pub use apply_pending_downgrade::{
    ApplyPendingDowngradeCommand, ApplyPendingDowngradeHandler, ApplyPendingDowngradeResult,
    PendingDowngradeReport,
};
pub use expire_subscriptions::{ExpireSubscriptionsHandler, SweepReport};
pub use schedule_downgrade::{
    ScheduleDowngradeCommand, ScheduleDowngradeHandler, ScheduleDowngradeResult,
};
