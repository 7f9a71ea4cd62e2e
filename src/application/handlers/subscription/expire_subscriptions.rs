//! ExpireSubscriptionsHandler - Resets lapsed paid profiles to the free plan.
//!
//! Payment providers tell us when a charge succeeds, not when one never
//! comes. The sweep closes that gap: any profile whose paid period has
//! lapsed without renewal drops back to the free plan and loses the badges
//! the paid package granted.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::free_plan::FreePlanService;
use crate::application::handlers::entitlements::{
    ApplyEntitlementsCommand, ApplyEntitlementsHandler,
};
use crate::domain::detective::Detective;
use crate::domain::entitlements::EntitlementReason;
use crate::domain::foundation::{DetectiveId, DomainError, PlanId, Timestamp};
use crate::domain::subscription::SubscriptionError;
use crate::ports::DetectiveRepository;

/// Outcome of an expiry sweep.
///
/// One failed profile never aborts the sweep; its error is collected and
/// the rest proceed.
#[derive(Debug, Clone)]
pub struct SweepReport {
    /// Profiles whose period had lapsed.
    pub checked: u32,
    /// Profiles reset to the free plan.
    pub downgraded: u32,
    /// Per-profile failures, as `"<detective_id>: <error>"`.
    pub errors: Vec<String>,
}

/// Handler that downgrades expired paid subscriptions.
///
/// Runs as a scheduled pass over the whole directory, or per profile when
/// one is loaded on a read path.
pub struct ExpireSubscriptionsHandler {
    detectives: Arc<dyn DetectiveRepository>,
    free_plans: Arc<FreePlanService>,
    entitlements: Arc<ApplyEntitlementsHandler>,
}

impl ExpireSubscriptionsHandler {
    pub fn new(
        detectives: Arc<dyn DetectiveRepository>,
        free_plans: Arc<FreePlanService>,
        entitlements: Arc<ApplyEntitlementsHandler>,
    ) -> Self {
        Self {
            detectives,
            free_plans,
            entitlements,
        }
    }

    /// Downgrade every profile whose paid period has lapsed.
    pub async fn sweep(&self) -> Result<SweepReport, SubscriptionError> {
        let free_plan_id = self.free_plans.free_plan_id().await?;
        let now = Timestamp::now();
        let expired = self
            .detectives
            .find_expired_paid(&free_plan_id, &now)
            .await?;

        let mut downgraded = 0u32;
        let mut errors = Vec::new();
        for detective in &expired {
            match self
                .downgrade_one(detective.clone(), free_plan_id, now)
                .await
            {
                Ok(()) => downgraded += 1,
                Err(error) => {
                    warn!(
                        detective_id = %detective.id,
                        error = %error,
                        "Expiry downgrade failed"
                    );
                    errors.push(format!("{}: {}", detective.id, error));
                }
            }
        }

        info!(
            checked = expired.len(),
            downgraded,
            failed = errors.len(),
            "Subscription expiry sweep finished"
        );

        Ok(SweepReport {
            checked: expired.len() as u32,
            downgraded,
            errors,
        })
    }

    /// Downgrade a single profile if its paid period has lapsed.
    ///
    /// Returns whether a downgrade was performed. Read paths call this so a
    /// profile loaded between sweeps never shows a stale paid plan.
    pub async fn check_detective(&self, id: &DetectiveId) -> Result<bool, SubscriptionError> {
        let free_plan_id = self.free_plans.free_plan_id().await?;
        let detective = self
            .detectives
            .find_by_id(id)
            .await?
            .ok_or(SubscriptionError::detective_not_found(*id))?;

        let now = Timestamp::now();
        let on_paid_plan = detective
            .subscription_package_id
            .map_or(false, |package| package != free_plan_id);
        if !detective.subscription_expired(&now) || !on_paid_plan {
            return Ok(false);
        }

        self.downgrade_one(detective, free_plan_id, now).await?;
        Ok(true)
    }

    async fn downgrade_one(
        &self,
        mut detective: Detective,
        free_plan_id: PlanId,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        let expired_package = detective.subscription_package_id;
        detective.reset_to_free(free_plan_id, now);
        self.detectives.update_subscription(&detective).await?;
        self.entitlements
            .handle(ApplyEntitlementsCommand {
                detective_id: detective.id,
                reason: EntitlementReason::Expiry,
            })
            .await?;

        info!(
            detective_id = %detective.id,
            expired_package = ?expired_package,
            "Reset expired subscription to free plan"
        );
        Ok(())
    }
}
