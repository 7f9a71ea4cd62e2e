//! Subscription plan entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PlanId, Timestamp, ValidationError};

use super::PlanBadges;

/// A subscription plan offered to detectives.
///
/// # Invariants
///
/// - `name` is a unique lowercase key (`free`, `pro`, `agency`, ...)
/// - Prices are stored as non-negative cents
/// - Exactly one active plan should have a zero monthly price; the free-plan
///   resolver fails loudly when none does
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    /// Unique identifier for this plan.
    pub id: PlanId,

    /// Unique lowercase key used in badge rules and admin tooling.
    pub name: String,

    /// Human-readable name shown on pricing pages.
    pub display_name: String,

    /// Monthly price in cents. Zero marks the free plan.
    pub monthly_price_cents: i64,

    /// Yearly price in cents.
    pub yearly_price_cents: i64,

    /// Marketing feature lines shown on pricing pages.
    pub features: Vec<String>,

    /// Badge flags this plan grants while the subscription is active.
    pub badges: PlanBadges,

    /// Maximum number of published service listings.
    pub service_limit: u32,

    /// Whether the plan can currently be activated.
    pub is_active: bool,

    /// When the plan was created.
    pub created_at: Timestamp,
}

impl SubscriptionPlan {
    /// Creates a new active plan with no features or badges.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the name is empty or a price is
    /// negative.
    pub fn new(
        id: PlanId,
        name: impl Into<String>,
        display_name: impl Into<String>,
        monthly_price_cents: i64,
        yearly_price_cents: i64,
        service_limit: u32,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if monthly_price_cents < 0 {
            return Err(ValidationError::invalid_format(
                "monthly_price_cents",
                "cannot be negative",
            ));
        }
        if yearly_price_cents < 0 {
            return Err(ValidationError::invalid_format(
                "yearly_price_cents",
                "cannot be negative",
            ));
        }
        Ok(Self {
            id,
            name,
            display_name: display_name.into(),
            monthly_price_cents,
            yearly_price_cents,
            features: Vec::new(),
            badges: PlanBadges::none(),
            service_limit,
            is_active: true,
            created_at: now,
        })
    }

    /// Whether this is the free plan.
    ///
    /// Identified by price, never by name; a renamed free plan still
    /// resolves.
    pub fn is_free(&self) -> bool {
        self.monthly_price_cents == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_plan(monthly_cents: i64) -> SubscriptionPlan {
        SubscriptionPlan::new(
            PlanId::new(),
            "pro",
            "Pro",
            monthly_cents,
            monthly_cents * 10,
            10,
            Timestamp::now(),
        )
        .unwrap()
    }

    #[test]
    fn zero_monthly_price_marks_free_plan() {
        assert!(test_plan(0).is_free());
    }

    #[test]
    fn nonzero_monthly_price_is_not_free() {
        assert!(!test_plan(2900).is_free());
    }

    #[test]
    fn new_plan_starts_active_with_no_badges() {
        let plan = test_plan(2900);
        assert!(plan.is_active);
        assert_eq!(plan.badges, PlanBadges::none());
        assert!(plan.features.is_empty());
    }

    #[test]
    fn empty_name_is_rejected() {
        let result = SubscriptionPlan::new(
            PlanId::new(),
            "",
            "Pro",
            2900,
            29000,
            10,
            Timestamp::now(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn negative_price_is_rejected() {
        let result = SubscriptionPlan::new(
            PlanId::new(),
            "pro",
            "Pro",
            -100,
            29000,
            10,
            Timestamp::now(),
        );
        assert!(result.is_err());
    }
}
