//! UpdatePlanHandler - Admin patch of a subscription plan.

use std::sync::Arc;

use tracing::info;

use crate::application::free_plan::FreePlanService;
use crate::domain::foundation::{DomainError, ErrorCode, PlanId, ValidationError};
use crate::domain::plan::{PlanBadges, SubscriptionPlan};
use crate::ports::PlanRepository;

/// Command to patch a plan. Unset fields are left alone.
///
/// The `name` key is immutable: badge rules and admin tooling refer to
/// plans by name.
#[derive(Debug, Clone, Default)]
pub struct UpdatePlanCommand {
    pub plan_id: PlanId,
    pub display_name: Option<String>,
    pub monthly_price_cents: Option<i64>,
    pub yearly_price_cents: Option<i64>,
    pub service_limit: Option<u32>,
    pub features: Option<Vec<String>>,
    pub badges: Option<PlanBadges>,
    pub is_active: Option<bool>,
}

/// Result carrying the plan after the patch.
#[derive(Debug, Clone)]
pub struct UpdatePlanResult {
    pub plan: SubscriptionPlan,
}

/// Handler for admin plan updates.
///
/// Price and activation changes can change which plan resolves as free, so
/// the cached free-plan id is dropped afterwards.
pub struct UpdatePlanHandler {
    plans: Arc<dyn PlanRepository>,
    free_plans: Arc<FreePlanService>,
}

impl UpdatePlanHandler {
    pub fn new(plans: Arc<dyn PlanRepository>, free_plans: Arc<FreePlanService>) -> Self {
        Self { plans, free_plans }
    }

    pub async fn handle(&self, cmd: UpdatePlanCommand) -> Result<UpdatePlanResult, DomainError> {
        // 1. Load the plan
        let mut plan = self.plans.find_by_id(&cmd.plan_id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::PlanNotFound,
                format!("Subscription plan not found: {}", cmd.plan_id),
            )
        })?;

        // 2. Validate and apply the patch
        if let Some(cents) = cmd.monthly_price_cents {
            if cents < 0 {
                return Err(
                    ValidationError::invalid_format("monthly_price_cents", "cannot be negative")
                        .into(),
                );
            }
            plan.monthly_price_cents = cents;
        }
        if let Some(cents) = cmd.yearly_price_cents {
            if cents < 0 {
                return Err(
                    ValidationError::invalid_format("yearly_price_cents", "cannot be negative")
                        .into(),
                );
            }
            plan.yearly_price_cents = cents;
        }
        if let Some(display_name) = cmd.display_name {
            plan.display_name = display_name;
        }
        if let Some(limit) = cmd.service_limit {
            plan.service_limit = limit;
        }
        if let Some(features) = cmd.features {
            plan.features = features;
        }
        if let Some(badges) = cmd.badges {
            plan.badges = badges;
        }
        if let Some(is_active) = cmd.is_active {
            plan.is_active = is_active;
        }

        // 3. Persist and invalidate the free-plan cache
        self.plans.update(&plan).await?;
        self.free_plans.clear_cache().await;

        info!(
            plan_id = %plan.id,
            plan_name = %plan.name,
            is_active = plan.is_active,
            "Updated subscription plan"
        );

        Ok(UpdatePlanResult { plan })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ErrorCode, Timestamp};
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════

    struct RecordingPlans {
        rows: Mutex<Vec<SubscriptionPlan>>,
        find_free_calls: Mutex<usize>,
    }

    impl RecordingPlans {
        fn with(rows: Vec<SubscriptionPlan>) -> Self {
            Self {
                rows: Mutex::new(rows),
                find_free_calls: Mutex::new(0),
            }
        }

        fn snapshot(&self, id: &PlanId) -> SubscriptionPlan {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == *id)
                .cloned()
                .unwrap()
        }
    }

    #[async_trait]
    impl PlanRepository for RecordingPlans {
        async fn create(&self, plan: &SubscriptionPlan) -> Result<(), DomainError> {
            self.rows.lock().unwrap().push(plan.clone());
            Ok(())
        }

        async fn update(&self, plan: &SubscriptionPlan) -> Result<(), DomainError> {
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|p| p.id == plan.id) {
                Some(row) => {
                    *row = plan.clone();
                    Ok(())
                }
                None => Err(DomainError::new(ErrorCode::PlanNotFound, "missing")),
            }
        }

        async fn find_by_id(&self, id: &PlanId) -> Result<Option<SubscriptionPlan>, DomainError> {
            Ok(self.rows.lock().unwrap().iter().find(|p| p.id == *id).cloned())
        }

        async fn find_by_ids(
            &self,
            _ids: &[PlanId],
        ) -> Result<Vec<SubscriptionPlan>, DomainError> {
            Ok(vec![])
        }

        async fn find_free(&self) -> Result<Option<SubscriptionPlan>, DomainError> {
            *self.find_free_calls.lock().unwrap() += 1;
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.is_free() && p.is_active)
                .cloned())
        }

        async fn list(&self, _active_only: bool) -> Result<Vec<SubscriptionPlan>, DomainError> {
            Ok(self.rows.lock().unwrap().clone())
        }
    }

    // ════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════

    fn plan(name: &str, monthly_cents: i64) -> SubscriptionPlan {
        SubscriptionPlan::new(
            PlanId::new(),
            name,
            name.to_uppercase(),
            monthly_cents,
            monthly_cents * 10,
            10,
            Timestamp::now(),
        )
        .unwrap()
    }

    fn handler(plans: Arc<RecordingPlans>) -> (UpdatePlanHandler, Arc<FreePlanService>) {
        let free_plans = Arc::new(FreePlanService::new(plans.clone()));
        (
            UpdatePlanHandler::new(plans, free_plans.clone()),
            free_plans,
        )
    }

    // ════════════════════════════════════════════════════════════════════
    // Success Tests
    // ════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn patches_only_the_given_fields() {
        let existing = plan("pro", 4900);
        let plan_id = existing.id;
        let plans = Arc::new(RecordingPlans::with(vec![existing]));
        let (handler, _) = handler(plans.clone());

        let result = handler
            .handle(UpdatePlanCommand {
                plan_id,
                monthly_price_cents: Some(5900),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(result.plan.monthly_price_cents, 5900);
        let stored = plans.snapshot(&plan_id);
        assert_eq!(stored.monthly_price_cents, 5900);
        // Untouched fields survive
        assert_eq!(stored.name, "pro");
        assert_eq!(stored.yearly_price_cents, 49000);
        assert!(stored.is_active);
    }

    #[tokio::test]
    async fn deactivation_invalidates_free_plan_cache() {
        let free = plan("free", 0);
        let free_id = free.id;
        let plans = Arc::new(RecordingPlans::with(vec![free]));
        let (handler, free_plans) = handler(plans.clone());

        free_plans.free_plan_id().await.unwrap();
        handler
            .handle(UpdatePlanCommand {
                plan_id: free_id,
                is_active: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();

        // The retired plan no longer resolves
        let err = free_plans.free_plan_id().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NoFreePlan);
        assert_eq!(*plans.find_free_calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn badges_replace_wholesale() {
        let existing = plan("agency", 14900);
        let plan_id = existing.id;
        let plans = Arc::new(RecordingPlans::with(vec![existing]));
        let (handler, _) = handler(plans.clone());
        let badges = PlanBadges {
            blue_tick: true,
            pro: true,
            recommended: true,
        };

        handler
            .handle(UpdatePlanCommand {
                plan_id,
                badges: Some(badges),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(plans.snapshot(&plan_id).badges, badges);
    }

    // ════════════════════════════════════════════════════════════════════
    // Failure Tests
    // ════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn unknown_plan_is_rejected() {
        let plans = Arc::new(RecordingPlans::with(vec![]));
        let (handler, _) = handler(plans);

        let err = handler
            .handle(UpdatePlanCommand {
                plan_id: PlanId::new(),
                is_active: Some(false),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::PlanNotFound);
    }

    #[tokio::test]
    async fn negative_price_is_rejected() {
        let existing = plan("pro", 4900);
        let plan_id = existing.id;
        let plans = Arc::new(RecordingPlans::with(vec![existing]));
        let (handler, _) = handler(plans.clone());

        let err = handler
            .handle(UpdatePlanCommand {
                plan_id,
                yearly_price_cents: Some(-100),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert_eq!(plans.snapshot(&plan_id).yearly_price_cents, 49000);
    }
}
