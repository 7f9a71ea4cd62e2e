//! RefreshVisibilityScoresHandler - Bulk score snapshot refresh.
//!
//! Recomputes the stored `visibility_score` for a batch of active profiles.
//! Inputs are loaded with the same fixed query count as the ranked
//! directory; only the per-row writes fan out, bounded so a large directory
//! cannot saturate the pool. One bad row never aborts the batch.

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::domain::detective::DetectiveStatus;
use crate::domain::foundation::{DetectiveId, DomainError, PlanId, ServiceId, Timestamp};
use crate::domain::plan::SubscriptionPlan;
use crate::domain::ranking::{fold_review_stats, visibility_score};
use crate::domain::visibility::VisibilityRecord;
use crate::ports::{CatalogReader, DetectiveRepository, DirectoryFilter, PlanRepository, VisibilityRepository};

/// Concurrent snapshot writes in flight at once.
const WRITE_CONCURRENCY: usize = 8;

/// Command to refresh score snapshots for active profiles.
#[derive(Debug, Clone)]
pub struct RefreshVisibilityScoresCommand {
    /// Upper bound on profiles refreshed in one run.
    pub limit: u32,
}

/// Outcome of a bulk refresh.
#[derive(Debug, Clone)]
pub struct RefreshVisibilityScoresResult {
    /// Snapshots successfully written.
    pub refreshed: u32,
    /// Per-profile failures, one line each; the batch always completes.
    pub errors: Vec<String>,
}

/// Handler that recomputes and stores scores for the active directory.
///
/// Unlike ranked reads, hidden profiles are refreshed too: the snapshot
/// must stay current for when an admin flips them visible again.
pub struct RefreshVisibilityScoresHandler {
    detectives: Arc<dyn DetectiveRepository>,
    plans: Arc<dyn PlanRepository>,
    visibility: Arc<dyn VisibilityRepository>,
    catalog: Arc<dyn CatalogReader>,
}

impl RefreshVisibilityScoresHandler {
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
        cmd: RefreshVisibilityScoresCommand,
    ) -> Result<RefreshVisibilityScoresResult, DomainError> {
        let now = Timestamp::now();

        // 1. Every active profile up to the limit, hidden ones included
        let filter = DirectoryFilter {
            status: DetectiveStatus::Active,
            country: None,
            query: None,
            limit: cmd.limit,
        };
        let detectives = self.detectives.list_page(&filter).await?;
        if detectives.is_empty() {
            return Ok(RefreshVisibilityScoresResult {
                refreshed: 0,
                errors: Vec::new(),
            });
        }

        // 2. Batch-load scoring inputs, one query per kind
        let detective_ids: Vec<DetectiveId> = detectives.iter().map(|d| d.id).collect();
        let plan_ids: Vec<PlanId> = detectives
            .iter()
            .filter_map(|d| d.subscription_package_id)
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();

        let (plans, visibilities, services) = tokio::try_join!(
            self.plans.find_by_ids(&plan_ids),
            self.visibility.find_by_detectives(&detective_ids),
            self.catalog.services_by_detectives(&detective_ids),
        )?;

        let service_ids: Vec<ServiceId> = services.iter().map(|s| s.service_id).collect();
        let review_rows = if service_ids.is_empty() {
            Vec::new()
        } else {
            self.catalog.review_stats_by_services(&service_ids).await?
        };

        let plans_by_id: HashMap<PlanId, SubscriptionPlan> =
            plans.into_iter().map(|p| (p.id, p)).collect();
        let visibility_by_id: HashMap<DetectiveId, VisibilityRecord> = visibilities
            .into_iter()
            .map(|v| (v.detective_id, v))
            .collect();
        let reviews_by_detective = fold_review_stats(&services, &review_rows);

        // 3. Score in memory
        let scored: Vec<(DetectiveId, i64)> = detectives
            .iter()
            .map(|detective| {
                let plan = detective
                    .subscription_package_id
                    .and_then(|id| plans_by_id.get(&id));
                let visibility = visibility_by_id.get(&detective.id);
                let review_stats = reviews_by_detective.get(&detective.id);
                (
                    detective.id,
                    visibility_score(detective, plan, visibility, review_stats, &now),
                )
            })
            .collect();

        // 4. Persist with bounded concurrency, collecting failures
        let outcomes: Vec<(DetectiveId, Result<(), DomainError>)> = stream::iter(scored)
            .map(|(id, score)| {
                let visibility = self.visibility.clone();
                async move { (id, visibility.record_score(&id, score, now).await) }
            })
            .buffer_unordered(WRITE_CONCURRENCY)
            .collect()
            .await;

        let mut refreshed = 0u32;
        let mut errors = Vec::new();
        for (id, outcome) in outcomes {
            match outcome {
                Ok(()) => refreshed += 1,
                Err(error) => {
                    warn!(detective_id = %id, error = %error, "Snapshot write failed");
                    errors.push(format!("{}: {}", id, error));
                }
            }
        }

        info!(refreshed, failed = errors.len(), "Visibility score refresh finished");

        Ok(RefreshVisibilityScoresResult { refreshed, errors })
    }
}
