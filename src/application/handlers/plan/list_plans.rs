//! ListPlansHandler - Lists subscription plans.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::plan::SubscriptionPlan;
use crate::ports::PlanRepository;

/// Query for the plan catalog.
#[derive(Debug, Clone)]
pub struct ListPlansQuery {
    /// Restrict to plans open for activation; admin views pass `false`.
    pub active_only: bool,
}

/// Result carrying the plan catalog.
#[derive(Debug, Clone)]
pub struct ListPlansResult {
    pub plans: Vec<SubscriptionPlan>,
}

/// Handler for the plan catalog.
pub struct ListPlansHandler {
    plans: Arc<dyn PlanRepository>,
}

impl ListPlansHandler {
    pub fn new(plans: Arc<dyn PlanRepository>) -> Self {
        Self { plans }
    }

    pub async fn handle(&self, query: ListPlansQuery) -> Result<ListPlansResult, DomainError> {
        let plans = self.plans.list(query.active_only).await?;
        Ok(ListPlansResult { plans })
    }
}
