//! Detective repository port.
//!
//! Defines the contract for persisting and retrieving Detective aggregates.
//! Implementations handle the actual database operations.
//!
//! # Design
//!
//! - **Empty vs failed**: read misses return `Ok(None)` / empty vectors;
//!   `Err` always means the query itself failed
//! - **Narrow writes**: subscription and blue-tick updates touch only their
//!   own columns, so concurrent profile edits are not clobbered
//!
//! # Example
//!
//! ```ignore
//! async fn expire_one(
//!     repo: &dyn DetectiveRepository,
//!     id: &DetectiveId,
//!     free_plan_id: PlanId,
//! ) -> Result<(), DomainError> {
//!     let mut detective = repo
//!         .find_by_id(id)
//!         .await?
//!         .ok_or_else(|| DomainError::new(ErrorCode::DetectiveNotFound, "unknown profile"))?;
//!
//!     detective.reset_to_free(free_plan_id, Timestamp::now());
//!     repo.update_subscription(&detective).await
//! }
//! ```

use crate::domain::detective::{Detective, DetectiveStatus};
use crate::domain::foundation::{DetectiveId, DomainError, PlanId, Timestamp};
use async_trait::async_trait;

/// Filter for directory page queries.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryFilter {
    /// Moderation status to list. The public directory uses `Active`.
    pub status: DetectiveStatus,

    /// Restrict to a single ISO country code.
    pub country: Option<String>,

    /// Free-text match against business name and description.
    pub query: Option<String>,

    /// Maximum number of profiles to return.
    pub limit: u32,
}

impl DirectoryFilter {
    /// The public directory default: active profiles, newest first.
    pub fn active(limit: u32) -> Self {
        Self {
            status: DetectiveStatus::Active,
            country: None,
            query: None,
            limit,
        }
    }
}

/// Repository port for Detective aggregate persistence.
#[async_trait]
pub trait DetectiveRepository: Send + Sync {
    /// Persist a newly registered profile.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the user already has a profile
    /// - `UserNotFound` if the owning user account does not exist
    /// - `DatabaseError` on persistence failure
    async fn create(&self, detective: &Detective) -> Result<(), DomainError>;

    /// Find a profile by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &DetectiveId) -> Result<Option<Detective>, DomainError>;

    /// List one directory page, newest profiles first.
    ///
    /// Ordering is `created_at` descending; ranking reorders in memory.
    async fn list_page(&self, filter: &DirectoryFilter) -> Result<Vec<Detective>, DomainError>;

    /// Persist the subscription columns of a profile.
    ///
    /// Writes package, billing cycle, activation, expiry, and pending
    /// fields; every other column is left alone.
    ///
    /// # Errors
    ///
    /// - `DetectiveNotFound` if the profile does not exist
    /// - `DatabaseError` on persistence failure
    async fn update_subscription(&self, detective: &Detective) -> Result<(), DomainError>;

    /// Persist the package-derived blue tick mirror.
    ///
    /// Granting stamps `blue_tick_activated_at = now`; revoking leaves the
    /// old stamp in place. Never touches `blue_tick_addon`.
    ///
    /// # Errors
    ///
    /// - `DetectiveNotFound` if the profile does not exist
    /// - `DatabaseError` on persistence failure
    async fn set_blue_tick(
        &self,
        id: &DetectiveId,
        granted: bool,
        now: Timestamp,
    ) -> Result<(), DomainError>;

    /// Find profiles whose paid period has strictly lapsed.
    ///
    /// Selects rows with an expiry in the past and a package other than the
    /// free plan. Rows without a package or without an expiry never match.
    async fn find_expired_paid(
        &self,
        free_plan_id: &PlanId,
        now: &Timestamp,
    ) -> Result<Vec<Detective>, DomainError>;

    /// Find profiles whose scheduled plan switch is due.
    ///
    /// Selects rows with a pending package and an expiry at or before `now`.
    async fn find_due_pending(&self, now: &Timestamp) -> Result<Vec<Detective>, DomainError>;
}
