//! ScheduleDowngradeHandler - Books a plan switch for the period end.
//!
//! A downgrade never cuts a paid period short: the switch is recorded as
//! pending and applied once the current period lapses. Only when no period
//! end can be determined at all does the switch apply on the spot.

use std::sync::Arc;

use tracing::info;

use crate::application::handlers::entitlements::{
    ApplyEntitlementsCommand, ApplyEntitlementsHandler,
};
use crate::domain::detective::Detective;
use crate::domain::entitlements::EntitlementReason;
use crate::domain::foundation::{DetectiveId, PlanId, Timestamp};
use crate::domain::subscription::{BillingCycle, SubscriptionError};
use crate::ports::{DetectiveRepository, PlanRepository};

/// Command to schedule a plan switch for the end of the current period.
#[derive(Debug, Clone)]
pub struct ScheduleDowngradeCommand {
    pub detective_id: DetectiveId,
    pub plan_id: PlanId,
    pub billing_cycle: BillingCycle,
}

/// Result of a downgrade request.
#[derive(Debug, Clone)]
pub struct ScheduleDowngradeResult {
    pub detective: Detective,
    /// Whether the switch happened now instead of being booked.
    pub applied_immediately: bool,
    /// When the new plan takes (or took) effect.
    pub effective_at: Timestamp,
}

/// Handler that books a downgrade for the period end.
///
/// The effective date is the stored expiry when one exists. A profile whose
/// expiry was never materialized gets one derived from its activation date
/// and billing cycle, so the booking pins a concrete date either way. With
/// neither expiry nor cycle there is no period to protect and the switch
/// applies immediately.
pub struct ScheduleDowngradeHandler {
    detectives: Arc<dyn DetectiveRepository>,
    plans: Arc<dyn PlanRepository>,
    entitlements: Arc<ApplyEntitlementsHandler>,
}

impl ScheduleDowngradeHandler {
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
        cmd: ScheduleDowngradeCommand,
    ) -> Result<ScheduleDowngradeResult, SubscriptionError> {
        // 1. Load the profile
        let mut detective = self
            .detectives
            .find_by_id(&cmd.detective_id)
            .await?
            .ok_or(SubscriptionError::detective_not_found(cmd.detective_id))?;

        // 2. The target plan must exist and be open for activation
        let plan = self
            .plans
            .find_by_id(&cmd.plan_id)
            .await?
            .ok_or(SubscriptionError::plan_not_found(cmd.plan_id))?;
        if !plan.is_active {
            return Err(SubscriptionError::plan_inactive(plan.name));
        }

        // 3. Determine when the current period ends
        let now = Timestamp::now();
        let period_end = detective.subscription_expires_at.or_else(|| {
            match (detective.subscription_activated_at, detective.billing_cycle) {
                (Some(activated), Some(cycle)) => Some(cycle.expiry_from(&activated)),
                _ => None,
            }
        });

        let Some(effective_at) = period_end else {
            // 4a. No running period; switch on the spot
            let expires_at = if plan.is_free() {
                None
            } else {
                Some(cmd.billing_cycle.expiry_from(&now))
            };
            detective.activate_subscription(plan.id, Some(cmd.billing_cycle), expires_at, now);
            self.detectives.update_subscription(&detective).await?;

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
                "Downgrade applied immediately: no running period"
            );

            return Ok(ScheduleDowngradeResult {
                detective,
                applied_immediately: true,
                effective_at: now,
            });
        };

        // 4b. Book the switch; entitlements stay until the period lapses
        detective.schedule_downgrade(plan.id, cmd.billing_cycle, effective_at, now);
        self.detectives.update_subscription(&detective).await?;

        info!(
            detective_id = %detective.id,
            plan = %plan.name,
            billing_cycle = %cmd.billing_cycle,
            effective_at = %effective_at,
            "Scheduled downgrade for period end"
        );

        Ok(ScheduleDowngradeResult {
            detective,
            applied_immediately: false,
            effective_at,
        })
    }
}
