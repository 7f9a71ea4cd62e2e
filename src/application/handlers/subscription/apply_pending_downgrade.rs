//! ApplyPendingDowngradeHandler - Executes booked plan switches.
//!
//! A downgrade booked by [`super::ScheduleDowngradeHandler`] sits in the
//! pending columns until the paid period lapses. This handler performs the
//! switch: per profile on demand, or as a batch pass over everything due.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::handlers::entitlements::{
    ApplyEntitlementsCommand, ApplyEntitlementsHandler,
};
use crate::domain::detective::Detective;
use crate::domain::entitlements::EntitlementReason;
use crate::domain::foundation::{DetectiveId, Timestamp};
use crate::domain::subscription::SubscriptionError;
use crate::ports::{DetectiveRepository, PlanRepository};

/// Command to apply a profile's booked plan switch if it is due.
#[derive(Debug, Clone)]
pub struct ApplyPendingDowngradeCommand {
    pub detective_id: DetectiveId,
}

/// Result of a single pending-downgrade check.
#[derive(Debug, Clone)]
pub struct ApplyPendingDowngradeResult {
    /// Whether a switch was performed.
    pub applied: bool,
    pub detective: Detective,
}

/// Outcome of a batch pass over all due switches.
///
/// One failed profile never aborts the pass; its error is collected and the
/// rest proceed.
#[derive(Debug, Clone)]
pub struct PendingDowngradeReport {
    /// Profiles with a switch due.
    pub checked: u32,
    /// Switches performed.
    pub applied: u32,
    /// Per-profile failures, as `"<detective_id>: <error>"`.
    pub errors: Vec<String>,
}

/// Handler that applies booked downgrades once their period lapsed.
///
/// The new period starts at application time, not at the booked date: a
/// switch picked up late still grants a full cycle.
pub struct ApplyPendingDowngradeHandler {
    detectives: Arc<dyn DetectiveRepository>,
    plans: Arc<dyn PlanRepository>,
    entitlements: Arc<ApplyEntitlementsHandler>,
}

impl ApplyPendingDowngradeHandler {
    pub fn new(
        detectives: Arc<dyn DetectiveRepository>,
        plans: Arc<dyn PlanRepository>,
        entitlements: Arc<ApplyEntitlementsHandler>,
    ) -> Self {
        Self {
            detectives,
            plans,
            entitlements,
        }
    }

    pub async fn handle(
        &self,
        cmd: ApplyPendingDowngradeCommand,
    ) -> Result<ApplyPendingDowngradeResult, SubscriptionError> {
        // 1. Load the profile
        let mut detective = self
            .detectives
            .find_by_id(&cmd.detective_id)
            .await?
            .ok_or(SubscriptionError::detective_not_found(cmd.detective_id))?;

        // 2. Nothing due means nothing to do
        let now = Timestamp::now();
        if !detective.pending_downgrade_due(&now) {
            return Ok(ApplyPendingDowngradeResult {
                applied: false,
                detective,
            });
        }
        let (Some(plan_id), Some(cycle)) = (
            detective.pending_package_id,
            detective.pending_billing_cycle,
        ) else {
            return Ok(ApplyPendingDowngradeResult {
                applied: false,
                detective,
            });
        };

        // 3. The booked plan must still exist and be open
        let plan = self
            .plans
            .find_by_id(&plan_id)
            .await?
            .ok_or(SubscriptionError::plan_not_found(plan_id))?;
        if !plan.is_active {
            return Err(SubscriptionError::plan_inactive(plan.name));
        }

        // 4. Switch, starting the new period now
        let expires_at = if plan.is_free() {
            None
        } else {
            Some(cycle.expiry_from(&now))
        };
        detective.activate_subscription(plan.id, Some(cycle), expires_at, now);
        self.detectives.update_subscription(&detective).await?;

        // 5. Re-sync what the new package grants
        let sync = self
            .entitlements
            .handle(ApplyEntitlementsCommand {
                detective_id: detective.id,
                reason: EntitlementReason::Downgrade,
            })
            .await?;
        detective.has_blue_tick = sync.has_blue_tick;

        info!(
            detective_id = %detective.id,
            plan = %plan.name,
            expires_at = ?expires_at,
            "Applied scheduled downgrade"
        );

        Ok(ApplyPendingDowngradeResult {
            applied: true,
            detective,
        })
    }

    /// Apply every booked switch whose period has lapsed.
    pub async fn run_due(&self) -> Result<PendingDowngradeReport, SubscriptionError> {
        let now = Timestamp::now();
        let due = self.detectives.find_due_pending(&now).await?;

        let mut applied = 0u32;
        let mut errors = Vec::new();
        for detective in &due {
            match self
                .handle(ApplyPendingDowngradeCommand {
                    detective_id: detective.id,
                })
                .await
            {
                Ok(result) if result.applied => applied += 1,
                Ok(_) => {}
                Err(error) => {
                    warn!(
                        detective_id = %detective.id,
                        error = %error,
                        "Scheduled downgrade failed"
                    );
                    errors.push(format!("{}: {}", detective.id, error));
                }
            }
        }

        info!(
            checked = due.len(),
            applied,
            failed = errors.len(),
            "Pending downgrade pass finished"
        );

        Ok(PendingDowngradeReport {
            checked: due.len() as u32,
            applied,
            errors,
        })
    }
}
