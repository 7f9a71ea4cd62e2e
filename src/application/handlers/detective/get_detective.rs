//! GetDetectiveHandler - Loads a profile with its resolved entitlements.
//!
//! The read path repairs stale subscription state before answering: a paid
//! period that lapsed between sweeps is reset here, so no response ever
//! shows a plan the detective no longer pays for.

use std::sync::Arc;

use tracing::debug;

use crate::application::free_plan::FreePlanService;
use crate::application::handlers::subscription::ExpireSubscriptionsHandler;
use crate::domain::detective::Detective;
use crate::domain::entitlements::{effective_badges, service_limit_for, EffectiveBadges};
use crate::domain::foundation::{DetectiveId, DomainError, ErrorCode, Timestamp};
use crate::domain::plan::SubscriptionPlan;
use crate::ports::{DetectiveRepository, PlanRepository};

/// Query for a single detective profile.
#[derive(Debug, Clone)]
pub struct GetDetectiveQuery {
    pub detective_id: DetectiveId,
}

/// A profile with everything the subscription currently grants.
#[derive(Debug, Clone)]
pub struct GetDetectiveResult {
    pub detective: Detective,
    /// The resolved plan; the free plan when none was assigned.
    pub plan: Option<SubscriptionPlan>,
    pub badges: EffectiveBadges,
    pub service_limit: u32,
    /// Whether an expired paid period was reset by this read.
    pub downgraded: bool,
}

/// Handler that loads a profile and resolves its entitlements.
pub struct GetDetectiveHandler {
    detectives: Arc<dyn DetectiveRepository>,
    plans: Arc<dyn PlanRepository>,
    free_plans: Arc<FreePlanService>,
    expiry: Arc<ExpireSubscriptionsHandler>,
}

impl GetDetectiveHandler {
    pub fn new(
        detectives: Arc<dyn DetectiveRepository>,
        plans: Arc<dyn PlanRepository>,
        free_plans: Arc<FreePlanService>,
        expiry: Arc<ExpireSubscriptionsHandler>,
    ) -> Self {
        Self {
            detectives,
            plans,
            free_plans,
            expiry,
        }
    }

    pub async fn handle(&self, query: GetDetectiveQuery) -> Result<GetDetectiveResult, DomainError> {
        // 1. Reset a lapsed paid period before reading
        let downgraded = self.expiry.check_detective(&query.detective_id).await?;

        // 2. Load the (possibly just reset) profile
        let detective = self
            .detectives
            .find_by_id(&query.detective_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::DetectiveNotFound,
                    format!("Detective not found: {}", query.detective_id),
                )
            })?;

        // 3. Resolve the plan, falling back to the free plan for rows
        //    that never got one assigned
        let plan_id = self
            .free_plans
            .ensure_plan(&detective.id, detective.subscription_package_id)
            .await?;
        let plan = self.plans.find_by_id(&plan_id).await?;

        // 4. Derive what the subscription grants right now
        let now = Timestamp::now();
        let badges = effective_badges(&detective, plan.as_ref(), &now);
        let service_limit = service_limit_for(&detective, plan.as_ref(), &now);

        debug!(
            detective_id = %detective.id,
            plan = ?plan.as_ref().map(|p| p.name.as_str()),
            downgraded,
            "Resolved detective profile"
        );

        Ok(GetDetectiveResult {
            detective,
            plan,
            badges,
            service_limit,
            downgraded,
        })
    }
}
