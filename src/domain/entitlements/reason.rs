//! Why an entitlement sync was triggered.

/// The subscription event that triggered an entitlement sync.
///
/// Recorded in grant/revoke logs so badge changes can be traced back to the
/// lifecycle event that caused them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntitlementReason {
    /// A new plan was activated after payment.
    Activation,

    /// The current plan was re-activated for another period.
    Renewal,

    /// A scheduled switch to a cheaper plan was applied.
    Downgrade,

    /// The paid period lapsed and the profile dropped to free.
    Expiry,
}

impl EntitlementReason {
    /// Returns the lowercase token used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntitlementReason::Activation => "activation",
            EntitlementReason::Renewal => "renewal",
            EntitlementReason::Downgrade => "downgrade",
            EntitlementReason::Expiry => "expiry",
        }
    }
}

impl std::fmt::Display for EntitlementReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
