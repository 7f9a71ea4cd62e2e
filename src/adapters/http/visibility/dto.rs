//! HTTP DTOs for visibility administration endpoints.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::visibility::{VisibilityPatch, VisibilityRecord};

/// Distinguishes an absent JSON field from an explicit `null`.
///
/// `manual_rank` is tri-state in the patch: absent leaves the override
/// alone, `null` clears it, a number sets it.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to patch visibility settings. Unset fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVisibilityRequest {
    #[serde(default)]
    pub is_visible: Option<bool>,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub manual_rank: Option<Option<i64>>,
}

impl From<UpdateVisibilityRequest> for VisibilityPatch {
    fn from(request: UpdateVisibilityRequest) -> Self {
        VisibilityPatch {
            is_visible: request.is_visible,
            is_featured: request.is_featured,
            manual_rank: request.manual_rank,
        }
    }
}

/// Request body for a bulk score refresh.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshScoresRequest {
    /// Upper bound on profiles refreshed in one run.
    #[serde(default)]
    pub limit: Option<u32>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Visibility settings and score snapshot for a profile.
#[derive(Debug, Clone, Serialize)]
pub struct VisibilityResponse {
    pub detective_id: String,
    pub is_visible: bool,
    pub is_featured: bool,
    pub manual_rank: Option<i64>,
    pub visibility_score: i64,
    /// When the score snapshot was last computed (ISO 8601).
    pub last_evaluated_at: Option<String>,
}

impl From<VisibilityRecord> for VisibilityResponse {
    fn from(record: VisibilityRecord) -> Self {
        Self {
            detective_id: record.detective_id.to_string(),
            is_visible: record.is_visible,
            is_featured: record.is_featured,
            manual_rank: record.manual_rank,
            visibility_score: record.visibility_score,
            last_evaluated_at: record
                .last_evaluated_at
                .as_ref()
                .map(|ts| ts.as_datetime().to_rfc3339()),
        }
    }
}

/// Response for a single-profile score recalculation.
#[derive(Debug, Clone, Serialize)]
pub struct RecalculateResponse {
    pub score: i64,
}

/// Response for a bulk score refresh.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshScoresResponse {
    pub refreshed: u32,
    pub errors: Vec<String>,
}
