//! Subscription domain module.
//!
//! Billing cycles and the error taxonomy for the subscription lifecycle.
//!
//! # Module Structure
//!
//! - `billing_cycle` - BillingCycle period arithmetic
//! - `errors` - SubscriptionError taxonomy

mod billing_cycle;
mod errors;

pub use billing_cycle::BillingCycle;
pub use errors::SubscriptionError;
