//! RankDetectivesHandler - Query handler for the ranked public directory.
//!
//! Profiles are scored and ordered in memory from batch-loaded inputs. The
//! query count is fixed per page regardless of page size: one page query,
//! one plan batch, one visibility batch, one service batch, one grouped
//! review aggregate.
//!
//! A ranked directory that errors is worse than an unranked one, so any
//! failure past the page query degrades to recency ordering instead of
//! surfacing an error. Only when the fallback query itself fails does the
//! caller see one.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::warn;

use crate::domain::detective::{Detective, DetectiveStatus};
use crate::domain::foundation::{DetectiveId, DomainError, PlanId, ServiceId, Timestamp};
use crate::domain::plan::SubscriptionPlan;
use crate::domain::ranking::{fold_review_stats, visibility_score, ReviewStats};
use crate::domain::visibility::VisibilityRecord;
use crate::ports::{CatalogReader, DetectiveRepository, DirectoryFilter, PlanRepository, VisibilityRepository};

/// Query for one ranked directory page.
#[derive(Debug, Clone)]
pub struct RankDetectivesQuery {
    /// Moderation status to list; the public directory uses `Active`.
    pub status: DetectiveStatus,
    pub country: Option<String>,
    pub query: Option<String>,
    pub limit: u32,
}

impl RankDetectivesQuery {
    /// The public directory default.
    pub fn active(limit: u32) -> Self {
        Self {
            status: DetectiveStatus::Active,
            country: None,
            query: None,
            limit,
        }
    }

    fn filter(&self) -> DirectoryFilter {
        DirectoryFilter {
            status: self.status,
            country: self.country.clone(),
            query: self.query.clone(),
            limit: self.limit,
        }
    }
}

/// One profile in the ranked directory.
#[derive(Debug, Clone)]
pub struct RankedDetective {
    pub detective: Detective,
    /// The current subscription plan, when it resolved.
    pub plan: Option<SubscriptionPlan>,
    /// Folded published-review aggregate across the profile's listings.
    pub review_stats: Option<ReviewStats>,
    pub score: i64,
    /// 1-based position after ordering.
    pub rank_position: u32,
    pub is_featured: bool,
}

/// Result of a ranked directory query.
#[derive(Debug, Clone)]
pub struct RankDetectivesResult {
    pub detectives: Vec<RankedDetective>,
    /// True when scoring inputs failed to load and the page fell back to
    /// recency ordering with zero scores.
    pub degraded: bool,
}

/// Handler for the ranked public directory.
pub struct RankDetectivesHandler {
    detectives: Arc<dyn DetectiveRepository>,
    plans: Arc<dyn PlanRepository>,
    visibility: Arc<dyn VisibilityRepository>,
    catalog: Arc<dyn CatalogReader>,
}

impl RankDetectivesHandler {
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
        query: RankDetectivesQuery,
    ) -> Result<RankDetectivesResult, DomainError> {
        let filter = query.filter();

        match self.rank_page(&filter).await {
            Ok(detectives) => Ok(RankDetectivesResult {
                detectives,
                degraded: false,
            }),
            Err(error) => {
                warn!(
                    error = %error,
                    "Ranked directory query failed; serving recency order"
                );
                let detectives = self.recency_fallback(&filter).await?;
                Ok(RankDetectivesResult {
                    detectives,
                    degraded: true,
                })
            }
        }
    }

    async fn rank_page(&self, filter: &DirectoryFilter) -> Result<Vec<RankedDetective>, DomainError> {
        let now = Timestamp::now();

        // 1. One page of profiles, newest first
        let detectives = self.detectives.list_page(filter).await?;
        if detectives.is_empty() {
            return Ok(Vec::new());
        }

        let detective_ids: Vec<DetectiveId> = detectives.iter().map(|d| d.id).collect();
        let plan_ids: Vec<PlanId> = detectives
            .iter()
            .filter_map(|d| d.subscription_package_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        // 2-4. Referenced plans, visibility rows, and service listings, one
        //      batched query each, issued concurrently
        let (plans, visibilities, services) = tokio::try_join!(
            self.plans.find_by_ids(&plan_ids),
            self.visibility.find_by_detectives(&detective_ids),
            self.catalog.services_by_detectives(&detective_ids),
        )?;

        // 5. Published-review aggregates, grouped per service in the store
        let service_ids: Vec<ServiceId> = services.iter().map(|s| s.service_id).collect();
        let review_rows = if service_ids.is_empty() {
            Vec::new()
        } else {
            self.catalog.review_stats_by_services(&service_ids).await?
        };

        // 6. Fold everything into lookup maps and score in memory
        let plans_by_id: HashMap<PlanId, SubscriptionPlan> =
            plans.into_iter().map(|p| (p.id, p)).collect();
        let visibility_by_id: HashMap<DetectiveId, VisibilityRecord> = visibilities
            .into_iter()
            .map(|v| (v.detective_id, v))
            .collect();
        let reviews_by_detective = fold_review_stats(&services, &review_rows);

        // 7. Drop hidden profiles; a missing row counts as visible
        let mut ranked: Vec<RankedDetective> = detectives
            .into_iter()
            .filter_map(|detective| {
                let visibility = visibility_by_id.get(&detective.id);
                if visibility.map_or(false, |v| !v.is_visible) {
                    return None;
                }

                let plan = detective
                    .subscription_package_id
                    .and_then(|id| plans_by_id.get(&id));
                let review_stats = reviews_by_detective.get(&detective.id).copied();
                let score =
                    visibility_score(&detective, plan, visibility, review_stats.as_ref(), &now);

                Some(RankedDetective {
                    plan: plan.cloned(),
                    review_stats,
                    score,
                    rank_position: 0,
                    is_featured: visibility.map_or(false, |v| v.is_featured),
                    detective,
                })
            })
            .collect();

        // 8. Score descending, newest first on ties, then 1-based positions
        ranked.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| b.detective.created_at.cmp(&a.detective.created_at))
        });
        for (index, entry) in ranked.iter_mut().enumerate() {
            entry.rank_position = (index + 1) as u32;
        }

        Ok(ranked)
    }

    /// Recency-only degraded page: same filter, no scoring inputs.
    async fn recency_fallback(
        &self,
        filter: &DirectoryFilter,
    ) -> Result<Vec<RankedDetective>, DomainError> {
        let detectives = self.detectives.list_page(filter).await?;

        Ok(detectives
            .into_iter()
            .enumerate()
            .map(|(index, detective)| RankedDetective {
                plan: None,
                review_stats: None,
                score: 0,
                rank_position: (index + 1) as u32,
                is_featured: false,
                detective,
            })
            .collect())
    }
}
