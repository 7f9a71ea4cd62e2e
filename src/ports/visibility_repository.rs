//! Visibility repository port.
//!
//! Visibility rows are optional: a profile without one behaves exactly like
//! one with default settings. Implementations must keep `ensure` idempotent
//! so callers can create-on-first-touch without racing each other.

use crate::domain::foundation::{DetectiveId, DomainError, Timestamp};
use crate::domain::visibility::VisibilityRecord;
use async_trait::async_trait;

/// Repository port for VisibilityRecord persistence.
#[async_trait]
pub trait VisibilityRepository: Send + Sync {
    /// Find the visibility row for a profile.
    ///
    /// Returns `None` if the profile has never been administered or scored.
    async fn find_by_detective(
        &self,
        id: &DetectiveId,
    ) -> Result<Option<VisibilityRecord>, DomainError>;

    /// Batch-load visibility rows for a set of profiles.
    ///
    /// Profiles without a row are simply absent from the result.
    async fn find_by_detectives(
        &self,
        ids: &[DetectiveId],
    ) -> Result<Vec<VisibilityRecord>, DomainError>;

    /// Insert the row if the profile has none; never overwrites.
    ///
    /// Calling twice is safe and leaves the existing row untouched.
    async fn ensure(&self, record: &VisibilityRecord) -> Result<(), DomainError>;

    /// Upsert the admin-controlled settings columns.
    ///
    /// Writes `is_visible`, `is_featured`, and `manual_rank`, creating the
    /// row when absent. The score snapshot columns are left alone on
    /// conflict.
    async fn upsert_settings(&self, record: &VisibilityRecord) -> Result<(), DomainError>;

    /// Upsert a computed score snapshot.
    ///
    /// Writes `visibility_score` and `last_evaluated_at`, creating a default
    /// row when absent.
    async fn record_score(
        &self,
        id: &DetectiveId,
        score: i64,
        evaluated_at: Timestamp,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn visibility_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn VisibilityRepository) {}
    }
}
