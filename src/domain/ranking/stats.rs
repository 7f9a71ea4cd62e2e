//! Review statistics and their aggregation across service listings.
//!
//! Reviews are written against individual service listings. Ranking needs
//! them per detective, so the grouped per-service aggregates coming out of
//! storage are folded up to the owning profile here, in memory.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DetectiveId, ServiceId};

/// A service listing reference: which detective owns which listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceRef {
    pub service_id: ServiceId,
    pub detective_id: DetectiveId,
}

/// Published-review aggregate for a single service listing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceReviewStats {
    pub service_id: ServiceId,
    pub count: u64,
    pub average: f64,
}

/// Review aggregate for a detective across all their listings.
///
/// Derived at read time and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewStats {
    pub count: u64,
    pub average: f64,
}

/// Folds per-service aggregates up to the owning detectives.
///
/// The combined average is weighted by review count. Services without
/// reviews contribute nothing; detectives whose services all lack reviews
/// get no entry.
pub fn fold_review_stats(
    services: &[ServiceRef],
    stats: &[ServiceReviewStats],
) -> HashMap<DetectiveId, ReviewStats> {
    let by_service: HashMap<ServiceId, &ServiceReviewStats> =
        stats.iter().map(|s| (s.service_id, s)).collect();

    let mut weighted: HashMap<DetectiveId, (u64, f64)> = HashMap::new();
    for service in services {
        if let Some(stat) = by_service.get(&service.service_id) {
            if stat.count == 0 {
                continue;
            }
            let entry = weighted.entry(service.detective_id).or_insert((0, 0.0));
            entry.0 += stat.count;
            entry.1 += stat.average * stat.count as f64;
        }
    }

    weighted
        .into_iter()
        .map(|(detective_id, (count, sum))| {
            (
                detective_id,
                ReviewStats {
                    count,
                    average: sum / count as f64,
                },
            )
        })
        .collect()
}
