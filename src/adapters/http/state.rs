//! Shared application state for HTTP handlers.
//!
//! This struct is cloned for each request and contains Arc-wrapped
//! dependencies. Stateless handlers are constructed on demand; the free-plan
//! cache, the entitlement mirror, and the expiry handler are built once and
//! shared so every path sees the same cache and the same sweep logic.

use std::sync::Arc;

use crate::application::{
    ActivateSubscriptionHandler, ApplyEntitlementsHandler, ApplyPendingDowngradeHandler,
    CreatePlanHandler, ExpireSubscriptionsHandler, FreePlanService, GetDetectiveHandler,
    ListPlansHandler, RankDetectivesHandler, RecalculateVisibilityHandler,
    RefreshVisibilityScoresHandler, RegisterDetectiveHandler, ScheduleDowngradeHandler,
    UpdatePlanHandler, UpdateVisibilityHandler,
};
use crate::ports::{CatalogReader, DetectiveRepository, PlanRepository, VisibilityRepository};

/// Directory page size bounds, taken from the `directory` config section.
#[derive(Debug, Clone, Copy)]
pub struct DirectoryLimits {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl DirectoryLimits {
    /// Clamps a requested page size to the configured bounds.
    pub fn clamp(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_page_size)
            .min(self.max_page_size)
            .max(1)
    }
}

/// Shared application state containing all dependencies.
#[derive(Clone)]
pub struct AppState {
    pub detectives: Arc<dyn DetectiveRepository>,
    pub plans: Arc<dyn PlanRepository>,
    pub visibility: Arc<dyn VisibilityRepository>,
    pub catalog: Arc<dyn CatalogReader>,
    pub free_plans: Arc<FreePlanService>,
    pub entitlements: Arc<ApplyEntitlementsHandler>,
    pub expiry: Arc<ExpireSubscriptionsHandler>,
    pub directory_limits: DirectoryLimits,
}

impl AppState {
    /// Wires the state from the four ports, building the shared services.
    pub fn new(
        detectives: Arc<dyn DetectiveRepository>,
        plans: Arc<dyn PlanRepository>,
        visibility: Arc<dyn VisibilityRepository>,
        catalog: Arc<dyn CatalogReader>,
        directory_limits: DirectoryLimits,
    ) -> Self {
        let free_plans = Arc::new(FreePlanService::new(plans.clone()));
        let entitlements = Arc::new(ApplyEntitlementsHandler::new(
            detectives.clone(),
            plans.clone(),
        ));
        let expiry = Arc::new(ExpireSubscriptionsHandler::new(
            detectives.clone(),
            free_plans.clone(),
            entitlements.clone(),
        ));

        Self {
            detectives,
            plans,
            visibility,
            catalog,
            free_plans,
            entitlements,
            expiry,
            directory_limits,
        }
    }

    /// Create handlers on demand from the shared state.
    pub fn register_detective_handler(&self) -> RegisterDetectiveHandler {
        RegisterDetectiveHandler::new(
            self.detectives.clone(),
            self.visibility.clone(),
            self.free_plans.clone(),
        )
    }

    pub fn get_detective_handler(&self) -> GetDetectiveHandler {
        GetDetectiveHandler::new(
            self.detectives.clone(),
            self.plans.clone(),
            self.free_plans.clone(),
            self.expiry.clone(),
        )
    }

    pub fn rank_detectives_handler(&self) -> RankDetectivesHandler {
        RankDetectivesHandler::new(
            self.detectives.clone(),
            self.plans.clone(),
            self.visibility.clone(),
            self.catalog.clone(),
        )
    }

    pub fn update_visibility_handler(&self) -> UpdateVisibilityHandler {
        UpdateVisibilityHandler::new(self.detectives.clone(), self.visibility.clone())
    }

    pub fn recalculate_visibility_handler(&self) -> RecalculateVisibilityHandler {
        RecalculateVisibilityHandler::new(
            self.detectives.clone(),
            self.plans.clone(),
            self.visibility.clone(),
            self.catalog.clone(),
        )
    }

    pub fn refresh_visibility_scores_handler(&self) -> RefreshVisibilityScoresHandler {
        RefreshVisibilityScoresHandler::new(
            self.detectives.clone(),
            self.plans.clone(),
            self.visibility.clone(),
            self.catalog.clone(),
        )
    }

    pub fn list_plans_handler(&self) -> ListPlansHandler {
        ListPlansHandler::new(self.plans.clone())
    }

    pub fn create_plan_handler(&self) -> CreatePlanHandler {
        CreatePlanHandler::new(self.plans.clone(), self.free_plans.clone())
    }

    pub fn update_plan_handler(&self) -> UpdatePlanHandler {
        UpdatePlanHandler::new(self.plans.clone(), self.free_plans.clone())
    }

    pub fn activate_subscription_handler(&self) -> ActivateSubscriptionHandler {
        ActivateSubscriptionHandler::new(
            self.detectives.clone(),
            self.plans.clone(),
            self.entitlements.clone(),
        )
    }

    pub fn schedule_downgrade_handler(&self) -> ScheduleDowngradeHandler {
        ScheduleDowngradeHandler::new(
            self.detectives.clone(),
            self.plans.clone(),
            self.entitlements.clone(),
        )
    }

    pub fn apply_pending_downgrade_handler(&self) -> ApplyPendingDowngradeHandler {
        ApplyPendingDowngradeHandler::new(
            self.detectives.clone(),
            self.plans.clone(),
            self.entitlements.clone(),
        )
    }
}
