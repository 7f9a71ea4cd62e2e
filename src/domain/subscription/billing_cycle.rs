//! Billing cycle definitions for paid subscriptions.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::subscription::SubscriptionError;

/// Billing cycle chosen when a paid plan is activated.
///
/// Free plans carry no cycle; the column stays empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    /// Renews every 30 days.
    Monthly,

    /// Renews every calendar year.
    Yearly,
}

impl BillingCycle {
    /// Returns the expiry of a period starting at `start`.
    ///
    /// Monthly periods run 30 days; yearly periods run one calendar year.
    pub fn expiry_from(&self, start: &Timestamp) -> Timestamp {
        match self {
            BillingCycle::Monthly => start.add_days(30),
            BillingCycle::Yearly => start.add_years(1),
        }
    }

    /// Returns the display name for this cycle.
    pub fn display_name(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "Monthly",
            BillingCycle::Yearly => "Yearly",
        }
    }

    /// Parses a cycle from client input, case-insensitively.
    pub fn parse(value: &str) -> Result<Self, SubscriptionError> {
        match value.to_lowercase().as_str() {
            "monthly" => Ok(BillingCycle::Monthly),
            "yearly" => Ok(BillingCycle::Yearly),
            _ => Err(SubscriptionError::invalid_billing_cycle(value)),
        }
    }
}

impl std::fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
