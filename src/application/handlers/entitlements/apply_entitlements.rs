//! ApplyEntitlementsHandler - Syncs the subscription-granted blue tick.
//!
//! The `has_blue_tick` column mirrors what the current package grants. It is
//! recomputed after every subscription transition: activation, renewal,
//! downgrade, expiry. The separately purchased `blue_tick_addon` is never
//! written here; it survives every plan change and is combined with the
//! mirror only at read time.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entitlements::EntitlementReason;
use crate::domain::foundation::{DetectiveId, DomainError, Timestamp};
use crate::ports::{DetectiveRepository, PlanRepository};

/// Command to re-sync a profile's package-granted entitlements.
#[derive(Debug, Clone)]
pub struct ApplyEntitlementsCommand {
    pub detective_id: DetectiveId,
    /// The subscription transition that triggered the sync.
    pub reason: EntitlementReason,
}

/// Result of an entitlement sync.
#[derive(Debug, Clone)]
pub struct ApplyEntitlementsResult {
    /// Whether a grant or revoke was persisted.
    pub changed: bool,
    /// The mirror value after the sync.
    pub has_blue_tick: bool,
}

/// Handler that recomputes the `has_blue_tick` mirror column.
///
/// Idempotent: the column is written only when the desired value differs
/// from the stored one. A missing profile is logged and ignored so batch
/// callers never abort on a deleted row.
pub struct ApplyEntitlementsHandler {
    detectives: Arc<dyn DetectiveRepository>,
    plans: Arc<dyn PlanRepository>,
}

impl ApplyEntitlementsHandler {
    pub fn new(detectives: Arc<dyn DetectiveRepository>, plans: Arc<dyn PlanRepository>) -> Self {
        Self { detectives, plans }
    }

    pub async fn handle(
        &self,
        cmd: ApplyEntitlementsCommand,
    ) -> Result<ApplyEntitlementsResult, DomainError> {
        let now = Timestamp::now();

        // 1. Load the profile; a missing one is ignored, not an error
        let detective = match self.detectives.find_by_id(&cmd.detective_id).await? {
            Some(detective) => detective,
            None => {
                warn!(
                    detective_id = %cmd.detective_id,
                    reason = cmd.reason.as_str(),
                    "Entitlement sync skipped: detective not found"
                );
                return Ok(ApplyEntitlementsResult {
                    changed: false,
                    has_blue_tick: false,
                });
            }
        };

        // 2. An expired package grants nothing; skip the plan lookup entirely
        let package_id = detective
            .subscription_package_id
            .filter(|_| !detective.subscription_expired(&now));

        // 3. Load the package badges for a live package
        let desired = match package_id {
            Some(plan_id) => self
                .plans
                .find_by_id(&plan_id)
                .await?
                .map_or(false, |plan| plan.badges.blue_tick),
            None => false,
        };

        // 4. Write the mirror only on change
        if desired == detective.has_blue_tick {
            return Ok(ApplyEntitlementsResult {
                changed: false,
                has_blue_tick: desired,
            });
        }

        self.detectives
            .set_blue_tick(&detective.id, desired, now)
            .await?;

        if desired {
            info!(
                detective_id = %detective.id,
                package_id = ?package_id,
                reason = cmd.reason.as_str(),
                "Granted subscription blue tick"
            );
        } else {
            info!(
                detective_id = %detective.id,
                package_id = ?package_id,
                reason = cmd.reason.as_str(),
                "Revoked subscription blue tick"
            );
        }

        Ok(ApplyEntitlementsResult {
            changed: true,
            has_blue_tick: desired,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::detective::Detective;
    use crate::domain::foundation::{ErrorCode, PlanId, UserId};
    use crate::domain::plan::{PlanBadges, SubscriptionPlan};
    use crate::ports::DirectoryFilter;
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    struct MockDetectiveRepository {
        detectives: Mutex<Vec<Detective>>,
        blue_tick_calls: Mutex<Vec<(DetectiveId, bool)>>,
        fail: bool,
    }

    impl MockDetectiveRepository {
        fn new() -> Self {
            Self {
                detectives: Mutex::new(Vec::new()),
                blue_tick_calls: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn with_detective(detective: Detective) -> Self {
            Self {
                detectives: Mutex::new(vec![detective]),
                blue_tick_calls: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                detectives: Mutex::new(Vec::new()),
                blue_tick_calls: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn blue_tick_calls(&self) -> Vec<(DetectiveId, bool)> {
            self.blue_tick_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DetectiveRepository for MockDetectiveRepository {
        async fn create(&self, detective: &Detective) -> Result<(), DomainError> {
            self.detectives.lock().unwrap().push(detective.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: &DetectiveId) -> Result<Option<Detective>, DomainError> {
            if self.fail {
                return Err(DomainError::new(ErrorCode::DatabaseError, "connection lost"));
            }
            Ok(self
                .detectives
                .lock()
                .unwrap()
                .iter()
                .find(|d| d.id == *id)
                .cloned())
        }

        async fn list_page(&self, _filter: &DirectoryFilter) -> Result<Vec<Detective>, DomainError> {
            Ok(vec![])
        }

        async fn update_subscription(&self, _detective: &Detective) -> Result<(), DomainError> {
            Ok(())
        }

        async fn set_blue_tick(
            &self,
            id: &DetectiveId,
            granted: bool,
            now: Timestamp,
        ) -> Result<(), DomainError> {
            self.blue_tick_calls.lock().unwrap().push((*id, granted));
            let mut detectives = self.detectives.lock().unwrap();
            if let Some(detective) = detectives.iter_mut().find(|d| d.id == *id) {
                detective.has_blue_tick = granted;
                detective.blue_tick_activated_at = granted.then_some(now);
            }
            Ok(())
        }

        async fn find_expired_paid(
            &self,
            _free_plan_id: &PlanId,
            _now: &Timestamp,
        ) -> Result<Vec<Detective>, DomainError> {
            Ok(vec![])
        }

        async fn find_due_pending(&self, _now: &Timestamp) -> Result<Vec<Detective>, DomainError> {
            Ok(vec![])
        }
    }

    struct MockPlanRepository {
        plans: Mutex<Vec<SubscriptionPlan>>,
        find_calls: Mutex<u32>,
    }

    impl MockPlanRepository {
        fn new() -> Self {
            Self {
                plans: Mutex::new(Vec::new()),
                find_calls: Mutex::new(0),
            }
        }

        fn with_plan(plan: SubscriptionPlan) -> Self {
            Self {
                plans: Mutex::new(vec![plan]),
                find_calls: Mutex::new(0),
            }
        }

        fn find_calls(&self) -> u32 {
            *self.find_calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl PlanRepository for MockPlanRepository {
        async fn create(&self, _plan: &SubscriptionPlan) -> Result<(), DomainError> {
            Ok(())
        }

        async fn update(&self, _plan: &SubscriptionPlan) -> Result<(), DomainError> {
            Ok(())
        }

        async fn find_by_id(&self, id: &PlanId) -> Result<Option<SubscriptionPlan>, DomainError> {
            *self.find_calls.lock().unwrap() += 1;
            Ok(self
                .plans
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == *id)
                .cloned())
        }

        async fn find_by_ids(&self, _ids: &[PlanId]) -> Result<Vec<SubscriptionPlan>, DomainError> {
            Ok(vec![])
        }

        async fn find_free(&self) -> Result<Option<SubscriptionPlan>, DomainError> {
            Ok(None)
        }

        async fn list(&self, _active_only: bool) -> Result<Vec<SubscriptionPlan>, DomainError> {
            Ok(vec![])
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn blue_tick_plan() -> SubscriptionPlan {
        let mut plan = SubscriptionPlan::new(
            PlanId::new(),
            "pro",
            "Pro",
            4900,
            49000,
            10,
            Timestamp::now(),
        )
        .unwrap();
        plan.badges = PlanBadges {
            blue_tick: true,
            pro: true,
            recommended: false,
        };
        plan
    }

    fn plain_plan() -> SubscriptionPlan {
        SubscriptionPlan::new(
            PlanId::new(),
            "basic",
            "Basic",
            1900,
            19000,
            5,
            Timestamp::now(),
        )
        .unwrap()
    }

    fn detective_on_plan(plan_id: PlanId) -> Detective {
        Detective::register(
            DetectiveId::new(),
            UserId::new("user-1").unwrap(),
            Some("Hart Investigations".to_string()),
            "GB".to_string(),
            plan_id,
            Timestamp::now(),
        )
    }

    fn sync_cmd(detective_id: DetectiveId) -> ApplyEntitlementsCommand {
        ApplyEntitlementsCommand {
            detective_id,
            reason: EntitlementReason::Activation,
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Success Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn grants_blue_tick_from_live_package() {
        let plan = blue_tick_plan();
        let detective = detective_on_plan(plan.id);
        let detective_id = detective.id;

        let detectives = Arc::new(MockDetectiveRepository::with_detective(detective));
        let plans = Arc::new(MockPlanRepository::with_plan(plan));
        let handler = ApplyEntitlementsHandler::new(detectives.clone(), plans);

        let result = handler.handle(sync_cmd(detective_id)).await.unwrap();

        assert!(result.changed);
        assert!(result.has_blue_tick);
        assert_eq!(detectives.blue_tick_calls(), vec![(detective_id, true)]);
    }

    #[tokio::test]
    async fn revokes_blue_tick_when_package_lacks_badge() {
        let plan = plain_plan();
        let mut detective = detective_on_plan(plan.id);
        detective.has_blue_tick = true;
        let detective_id = detective.id;

        let detectives = Arc::new(MockDetectiveRepository::with_detective(detective));
        let plans = Arc::new(MockPlanRepository::with_plan(plan));
        let handler = ApplyEntitlementsHandler::new(detectives.clone(), plans);

        let result = handler.handle(sync_cmd(detective_id)).await.unwrap();

        assert!(result.changed);
        assert!(!result.has_blue_tick);
        assert_eq!(detectives.blue_tick_calls(), vec![(detective_id, false)]);
    }

    #[tokio::test]
    async fn expired_package_counts_as_no_package() {
        let plan = blue_tick_plan();
        let mut detective = detective_on_plan(plan.id);
        detective.has_blue_tick = true;
        detective.subscription_expires_at = Some(Timestamp::now().minus_days(3));
        let detective_id = detective.id;

        let detectives = Arc::new(MockDetectiveRepository::with_detective(detective));
        let plans = Arc::new(MockPlanRepository::with_plan(plan));
        let handler = ApplyEntitlementsHandler::new(detectives.clone(), plans.clone());

        let result = handler.handle(sync_cmd(detective_id)).await.unwrap();

        assert!(result.changed);
        assert!(!result.has_blue_tick);
        // The plan is never even loaded for an expired package
        assert_eq!(plans.find_calls(), 0);
    }

    #[tokio::test]
    async fn sync_is_idempotent() {
        let plan = blue_tick_plan();
        let mut detective = detective_on_plan(plan.id);
        detective.has_blue_tick = true;
        let detective_id = detective.id;

        let detectives = Arc::new(MockDetectiveRepository::with_detective(detective));
        let plans = Arc::new(MockPlanRepository::with_plan(plan));
        let handler = ApplyEntitlementsHandler::new(detectives.clone(), plans);

        let result = handler.handle(sync_cmd(detective_id)).await.unwrap();

        assert!(!result.changed);
        assert!(result.has_blue_tick);
        assert!(detectives.blue_tick_calls().is_empty());
    }

    #[tokio::test]
    async fn addon_is_never_written() {
        // Addon holder whose package grants nothing: mirror goes false,
        // addon column is untouched by the narrow set_blue_tick write.
        let plan = plain_plan();
        let mut detective = detective_on_plan(plan.id);
        detective.has_blue_tick = true;
        detective.blue_tick_addon = true;
        let detective_id = detective.id;

        let detectives = Arc::new(MockDetectiveRepository::with_detective(detective));
        let plans = Arc::new(MockPlanRepository::with_plan(plan));
        let handler = ApplyEntitlementsHandler::new(detectives.clone(), plans);

        handler.handle(sync_cmd(detective_id)).await.unwrap();

        let stored = detectives
            .find_by_id(&detective_id)
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.has_blue_tick);
        assert!(stored.blue_tick_addon);
    }

    #[tokio::test]
    async fn missing_detective_is_ignored() {
        let detectives = Arc::new(MockDetectiveRepository::new());
        let plans = Arc::new(MockPlanRepository::new());
        let handler = ApplyEntitlementsHandler::new(detectives.clone(), plans);

        let result = handler.handle(sync_cmd(DetectiveId::new())).await.unwrap();

        assert!(!result.changed);
        assert!(detectives.blue_tick_calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_package_row_grants_nothing() {
        // Package id points at a deleted plan row
        let detective = detective_on_plan(PlanId::new());
        let detective_id = detective.id;

        let detectives = Arc::new(MockDetectiveRepository::with_detective(detective));
        let plans = Arc::new(MockPlanRepository::new());
        let handler = ApplyEntitlementsHandler::new(detectives, plans);

        let result = handler.handle(sync_cmd(detective_id)).await.unwrap();

        assert!(!result.changed);
        assert!(!result.has_blue_tick);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Failure Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn repository_failure_propagates() {
        let detectives = Arc::new(MockDetectiveRepository::failing());
        let plans = Arc::new(MockPlanRepository::new());
        let handler = ApplyEntitlementsHandler::new(detectives, plans);

        let err = handler.handle(sync_cmd(DetectiveId::new())).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
