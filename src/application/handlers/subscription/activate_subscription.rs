//! ActivateSubscriptionHandler - Starts a plan period after verified payment.
//!
//! Called once the payment provider has confirmed the charge (or directly for
//! a zero-price plan, which needs no charge). The new period starts now and
//! supersedes any scheduled downgrade.

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

/// Command to activate a plan for a detective.
#[derive(Debug, Clone)]
pub struct ActivateSubscriptionCommand {
    pub detective_id: DetectiveId,
    pub plan_id: PlanId,
    pub billing_cycle: BillingCycle,
}

/// Result of a plan activation.
#[derive(Debug, Clone)]
pub struct ActivateSubscriptionResult {
    /// The profile after the switch, entitlements included.
    pub detective: Detective,
    /// Whether the same package was re-activated rather than switched.
    pub renewed: bool,
}

/// Handler that activates a subscription plan.
///
/// The paid period runs from now for one billing cycle. A zero-price plan
/// activates with no expiry; free never lapses. After the switch the
/// package-granted entitlements are re-synced.
pub struct ActivateSubscriptionHandler {
    detectives: Arc<dyn DetectiveRepository>,
    plans: Arc<dyn PlanRepository>,
    entitlements: Arc<ApplyEntitlementsHandler>,
}

impl ActivateSubscriptionHandler {
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
        cmd: ActivateSubscriptionCommand,
    ) -> Result<ActivateSubscriptionResult, SubscriptionError> {
        // 1. Load the profile
        let mut detective = self
            .detectives
            .find_by_id(&cmd.detective_id)
            .await?
            .ok_or(SubscriptionError::detective_not_found(cmd.detective_id))?;

        // 2. The plan must exist and be open for activation
        let plan = self
            .plans
            .find_by_id(&cmd.plan_id)
            .await?
            .ok_or(SubscriptionError::plan_not_found(cmd.plan_id))?;
        if !plan.is_active {
            return Err(SubscriptionError::plan_inactive(plan.name));
        }

        // 3. Same package again is a renewal, not a switch
        let renewed = detective.subscription_package_id == Some(plan.id);

        // 4. Start the period; free plans carry no expiry
        let now = Timestamp::now();
        let expires_at = if plan.is_free() {
            None
        } else {
            Some(cmd.billing_cycle.expiry_from(&now))
        };
        detective.activate_subscription(plan.id, Some(cmd.billing_cycle), expires_at, now);
        self.detectives.update_subscription(&detective).await?;

        // 5. Re-sync what the new package grants
        let reason = if renewed {
            EntitlementReason::Renewal
        } else {
            EntitlementReason::Activation
        };
        let sync = self
            .entitlements
            .handle(ApplyEntitlementsCommand {
                detective_id: detective.id,
                reason,
            })
            .await?;
        detective.has_blue_tick = sync.has_blue_tick;

        info!(
            detective_id = %detective.id,
            plan = %plan.name,
            billing_cycle = %cmd.billing_cycle,
            expires_at = ?expires_at,
            renewed,
            "Activated subscription plan"
        );

        Ok(ActivateSubscriptionResult { detective, renewed })
    }
}
