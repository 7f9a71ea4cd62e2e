//! Catalog reader port (read side).
//!
//! Batch reads over service listings and their published reviews, shaped for
//! the ranking pipeline: one query per batch, grouped aggregation done by
//! the store. The write side of services and reviews lives elsewhere.

use crate::domain::foundation::{DetectiveId, DomainError, ServiceId};
use crate::domain::ranking::{ServiceRef, ServiceReviewStats};
use async_trait::async_trait;

/// Read port for service listings and review aggregates.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// All service listings owned by the given profiles, in one query.
    async fn services_by_detectives(
        &self,
        detective_ids: &[DetectiveId],
    ) -> Result<Vec<ServiceRef>, DomainError>;

    /// Published-review count and average per service, in one grouped query.
    ///
    /// Services without published reviews produce no row.
    async fn review_stats_by_services(
        &self,
        service_ids: &[ServiceId],
    ) -> Result<Vec<ServiceReviewStats>, DomainError>;
}
