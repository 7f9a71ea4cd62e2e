//! RecalculateVisibilityHandler - Recomputes one profile's score snapshot.
//!
//! The snapshot (`visibility_score`, `last_evaluated_at`) is a cached value
//! for admin tooling; live directory pages always score in memory. This
//! handler refreshes it after review or activity changes.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::{DetectiveId, DomainError, ErrorCode, ServiceId, Timestamp};
use crate::domain::ranking::{fold_review_stats, visibility_score};
use crate::ports::{CatalogReader, DetectiveRepository, PlanRepository, VisibilityRepository};

/// Command to recompute and store one profile's score.
#[derive(Debug, Clone)]
pub struct RecalculateVisibilityCommand {
    pub detective_id: DetectiveId,
}

/// Result of a score recalculation.
#[derive(Debug, Clone)]
pub struct RecalculateVisibilityResult {
    pub score: i64,
}

/// Handler that recomputes and persists one score snapshot.
pub struct RecalculateVisibilityHandler {
    detectives: Arc<dyn DetectiveRepository>,
    plans: Arc<dyn PlanRepository>,
    visibility: Arc<dyn VisibilityRepository>,
    catalog: Arc<dyn CatalogReader>,
}

impl RecalculateVisibilityHandler {
    pub fn new(
        detectives: Arc<dyn DetectiveRepository>,
        plans: Arc<dyn PlanRepository>,
        visibility: Arc<dyn VisibilityRepository>,
        catalog: Arc<dyn CatalogReader>,
    ) -> Self {
        Self {
            detectives,
            plans,
            visibility,
            catalog,
        }
    }

    pub async fn handle(
        &self,
        cmd: RecalculateVisibilityCommand,
    ) -> Result<RecalculateVisibilityResult, DomainError> {
        let now = Timestamp::now();

        // 1. The profile must exist; snapshots for deleted rows are useless
        let detective = self
            .detectives
            .find_by_id(&cmd.detective_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::DetectiveNotFound,
                    format!("Detective not found: {}", cmd.detective_id),
                )
            })?;

        // 2. Load the scoring inputs
        let detective_ids = [detective.id];
        let (visibility, services) = tokio::try_join!(
            self.visibility.find_by_detective(&detective.id),
            self.catalog.services_by_detectives(&detective_ids),
        )?;

        let plan = match detective.subscription_package_id {
            Some(plan_id) => self.plans.find_by_id(&plan_id).await?,
            None => None,
        };

        let service_ids: Vec<ServiceId> = services.iter().map(|s| s.service_id).collect();
        let review_rows = if service_ids.is_empty() {
            Vec::new()
        } else {
            self.catalog.review_stats_by_services(&service_ids).await?
        };
        let review_stats = fold_review_stats(&services, &review_rows)
            .remove(&detective.id);

        // 3. Score and persist the snapshot
        let score = visibility_score(
            &detective,
            plan.as_ref(),
            visibility.as_ref(),
            review_stats.as_ref(),
            &now,
        );
        self.visibility
            .record_score(&detective.id, score, now)
            .await?;

        debug!(detective_id = %detective.id, score, "Stored visibility score snapshot");

        Ok(RecalculateVisibilityResult { score })
    }
}
