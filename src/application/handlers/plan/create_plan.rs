//! CreatePlanHandler - Admin creation of a subscription plan.

use std::sync::Arc;

use tracing::info;

use crate::application::free_plan::FreePlanService;
use crate::domain::foundation::{DomainError, PlanId, Timestamp};
use crate::domain::plan::{PlanBadges, SubscriptionPlan};
use crate::ports::PlanRepository;

/// Command to create a plan.
#[derive(Debug, Clone)]
pub struct CreatePlanCommand {
    pub name: String,
    pub display_name: String,
    pub monthly_price_cents: i64,
    pub yearly_price_cents: i64,
    pub service_limit: u32,
    pub features: Vec<String>,
    pub badges: PlanBadges,
}

/// Result carrying the created plan.
#[derive(Debug, Clone)]
pub struct CreatePlanResult {
    pub plan: SubscriptionPlan,
}

/// Handler for admin plan creation.
///
/// Creating a plan can change which plan resolves as free, so the cached
/// free-plan id is dropped afterwards.
pub struct CreatePlanHandler {
    plans: Arc<dyn PlanRepository>,
    free_plans: Arc<FreePlanService>,
}

impl CreatePlanHandler {
    pub fn new(plans: Arc<dyn PlanRepository>, free_plans: Arc<FreePlanService>) -> Self {
        Self { plans, free_plans }
    }

    pub async fn handle(&self, cmd: CreatePlanCommand) -> Result<CreatePlanResult, DomainError> {
        // 1. Build and validate the plan
        let mut plan = SubscriptionPlan::new(
            PlanId::new(),
            cmd.name,
            cmd.display_name,
            cmd.monthly_price_cents,
            cmd.yearly_price_cents,
            cmd.service_limit,
            Timestamp::now(),
        )?;
        plan.features = cmd.features;
        plan.badges = cmd.badges;

        // 2. Persist and invalidate the free-plan cache
        self.plans.create(&plan).await?;
        self.free_plans.clear_cache().await;

        info!(
            plan_id = %plan.id,
            plan_name = %plan.name,
            monthly_price_cents = plan.monthly_price_cents,
            "Created subscription plan"
        );

        Ok(CreatePlanResult { plan })
    }
}
