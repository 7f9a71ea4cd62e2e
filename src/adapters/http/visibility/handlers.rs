//! HTTP handlers for visibility administration.
//!
//! These endpoints sit behind the admin router; the public directory never
//! touches them. Patches and recalculations act on one profile, the refresh
//! endpoint walks the directory in bulk.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::application::{
    RecalculateVisibilityCommand, RefreshVisibilityScoresCommand, UpdateVisibilityCommand,
};
use crate::domain::foundation::DetectiveId;

use super::dto::{
    RecalculateResponse, RefreshScoresRequest, RefreshScoresResponse, UpdateVisibilityRequest,
    VisibilityResponse,
};

/// Profiles touched per refresh run when the request does not say.
const DEFAULT_REFRESH_LIMIT: u32 = 500;

/// PATCH /detectives/:id/visibility
///
/// Applies a partial update to a profile's visibility settings. An empty
/// patch is rejected rather than silently writing nothing.
pub async fn update_visibility(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVisibilityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .update_visibility_handler()
        .handle(UpdateVisibilityCommand {
            detective_id: DetectiveId::from_uuid(id),
            patch: request.into(),
        })
        .await?;

    Ok(Json(VisibilityResponse::from(result.record)))
}

/// POST /detectives/:id/visibility/recalculate
///
/// Recomputes and stores one profile's score snapshot.
pub async fn recalculate_visibility(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .recalculate_visibility_handler()
        .handle(RecalculateVisibilityCommand {
            detective_id: DetectiveId::from_uuid(id),
        })
        .await?;

    Ok(Json(RecalculateResponse {
        score: result.score,
    }))
}

/// POST /visibility/refresh
///
/// Recomputes score snapshots across the directory, bounded by `limit`.
pub async fn refresh_scores(
    State(state): State<AppState>,
    Json(request): Json<RefreshScoresRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .refresh_visibility_scores_handler()
        .handle(RefreshVisibilityScoresCommand {
            limit: request.limit.unwrap_or(DEFAULT_REFRESH_LIMIT),
        })
        .await?;

    Ok(Json(RefreshScoresResponse {
        refreshed: result.refreshed,
        errors: result.errors,
    }))
}
