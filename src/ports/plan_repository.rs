//! Subscription plan repository port.

use crate::domain::foundation::{DomainError, PlanId};
use crate::domain::plan::SubscriptionPlan;
use async_trait::async_trait;

/// Repository port for SubscriptionPlan persistence.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Persist a new plan.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the name is already taken
    /// - `DatabaseError` on persistence failure
    async fn create(&self, plan: &SubscriptionPlan) -> Result<(), DomainError>;

    /// Persist changes to an existing plan.
    ///
    /// # Errors
    ///
    /// - `PlanNotFound` if the plan does not exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, plan: &SubscriptionPlan) -> Result<(), DomainError>;

    /// Find a plan by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &PlanId) -> Result<Option<SubscriptionPlan>, DomainError>;

    /// Batch-load plans by ID.
    ///
    /// Missing IDs are simply absent from the result; order is unspecified.
    async fn find_by_ids(&self, ids: &[PlanId]) -> Result<Vec<SubscriptionPlan>, DomainError>;

    /// Find the free plan: active with a zero monthly price.
    ///
    /// When several qualify the oldest wins, so the resolved ID is stable.
    /// Returns `None` when no active zero-price plan exists.
    async fn find_free(&self) -> Result<Option<SubscriptionPlan>, DomainError>;

    /// List plans, optionally restricted to active ones.
    async fn list(&self, active_only: bool) -> Result<Vec<SubscriptionPlan>, DomainError>;
}
