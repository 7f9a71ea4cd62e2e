//! FreePlanService - Cached resolution of the platform free plan.
//!
//! Nearly every profile read and the whole expiry sweep need the free plan's
//! id, but the row only changes when an admin edits plans. The id is resolved
//! once, held in memory, and dropped on explicit invalidation after plan
//! mutations. Concurrent cold lookups collapse into a single query.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::domain::foundation::{DetectiveId, DomainError, ErrorCode, PlanId};
use crate::ports::PlanRepository;

/// Resolves and caches the id of the zero-price active plan.
///
/// The platform cannot operate without a free plan: expired subscriptions
/// have nowhere to land. Resolution therefore fails loudly with `NoFreePlan`
/// instead of inventing a default.
pub struct FreePlanService {
    plans: Arc<dyn PlanRepository>,
    cached: RwLock<Option<PlanId>>,
    /// Serializes cold-path lookups so a cache miss under load issues one
    /// query instead of a stampede.
    refresh: Mutex<()>,
}

impl FreePlanService {
    pub fn new(plans: Arc<dyn PlanRepository>) -> Self {
        Self {
            plans,
            cached: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    /// The id of the free plan, from cache when warm.
    ///
    /// # Errors
    ///
    /// - `NoFreePlan` if no active zero-price plan exists
    /// - `DatabaseError` if the lookup itself fails
    pub async fn free_plan_id(&self) -> Result<PlanId, DomainError> {
        if let Some(id) = *self.cached.read().await {
            return Ok(id);
        }

        // Cold path: one caller queries, the rest wait and reuse the fill
        let _guard = self.refresh.lock().await;
        if let Some(id) = *self.cached.read().await {
            return Ok(id);
        }

        let plan = self.plans.find_free().await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::NoFreePlan,
                "No active free plan is configured",
            )
        })?;

        info!(plan_id = %plan.id, plan_name = %plan.name, "Resolved free plan");
        *self.cached.write().await = Some(plan.id);

        Ok(plan.id)
    }

    /// Drops the cached id so the next lookup re-queries.
    ///
    /// Called after admin plan mutations.
    pub async fn clear_cache(&self) {
        *self.cached.write().await = None;
        debug!("Free plan cache cleared");
    }

    /// Returns the current package id, or the free plan id when none is set.
    ///
    /// Legacy rows predate the "every profile has a plan" rule. The repair is
    /// response-level only; nothing is written back here.
    pub async fn ensure_plan(
        &self,
        detective_id: &DetectiveId,
        current: Option<PlanId>,
    ) -> Result<PlanId, DomainError> {
        match current {
            Some(id) => Ok(id),
            None => {
                warn!(
                    detective_id = %detective_id,
                    "Profile has no subscription package; resolving free plan"
                );
                self.free_plan_id().await
            }
        }
    }
}
