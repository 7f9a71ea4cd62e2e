//! Directory visibility controls for a detective profile.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DetectiveId, Timestamp};

/// Per-detective directory visibility settings and the last computed score.
///
/// Rows are created lazily with safe defaults the first time a profile is
/// ranked or administered; a profile without a row behaves exactly like one
/// with a default row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityRecord {
    /// Profile these settings belong to. One row per detective.
    pub detective_id: DetectiveId,

    /// Whether the profile appears in the public directory.
    pub is_visible: bool,

    /// Editorial highlight flag, surfaced to clients but not scored.
    pub is_featured: bool,

    /// Absolute score override set by admins. `None` means scored normally.
    pub manual_rank: Option<i64>,

    /// Last computed visibility score snapshot.
    pub visibility_score: i64,

    /// When the score snapshot was last recomputed.
    pub last_evaluated_at: Option<Timestamp>,

    /// When the row was created.
    pub created_at: Timestamp,

    /// When the row was last updated.
    pub updated_at: Timestamp,
}

impl VisibilityRecord {
    /// Creates the default settings for a profile.
    ///
    /// Visible, not featured, no override, score zero.
    pub fn with_defaults(detective_id: DetectiveId, now: Timestamp) -> Self {
        Self {
            detective_id,
            is_visible: true,
            is_featured: false,
            manual_rank: None,
            visibility_score: 0,
            last_evaluated_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stores a freshly computed score snapshot.
    pub fn record_score(&mut self, score: i64, now: Timestamp) {
        self.visibility_score = score;
        self.last_evaluated_at = Some(now);
        self.updated_at = now;
    }

    /// Applies an admin patch, leaving unset fields untouched.
    pub fn apply(&mut self, patch: &VisibilityPatch, now: Timestamp) {
        if let Some(is_visible) = patch.is_visible {
            self.is_visible = is_visible;
        }
        if let Some(is_featured) = patch.is_featured {
            self.is_featured = is_featured;
        }
        if let Some(manual_rank) = patch.manual_rank {
            self.manual_rank = manual_rank;
        }
        self.updated_at = now;
    }
}

/// Partial update to visibility settings.
///
/// `manual_rank` is tri-state: `None` leaves the override alone,
/// `Some(None)` clears it, `Some(Some(n))` sets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibilityPatch {
    pub is_visible: Option<bool>,
    pub is_featured: Option<bool>,
    pub manual_rank: Option<Option<i64>>,
}

impl VisibilityPatch {
    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.is_visible.is_none() && self.is_featured.is_none() && self.manual_rank.is_none()
    }
}
