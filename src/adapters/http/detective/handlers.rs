//! HTTP handlers for detective endpoints.
//!
//! These handlers connect Axum routes to application layer command/query
//! handlers.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::application::{GetDetectiveQuery, RankDetectivesQuery, RegisterDetectiveCommand};
use crate::domain::detective::DetectiveStatus;
use crate::domain::foundation::{DetectiveId, DomainError, Timestamp, UserId};

use super::dto::{
    DetectiveResponse, DirectoryEntryResponse, DirectoryQuery, DirectoryResponse, ProfileResponse,
    RegisterDetectiveRequest,
};

/// POST /api/detectives - Register a new detective profile
pub async fn register_detective(
    State(state): State<AppState>,
    Json(request): Json<RegisterDetectiveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = UserId::new(request.user_id).map_err(DomainError::from)?;

    let handler = state.register_detective_handler();
    let cmd = RegisterDetectiveCommand {
        user_id,
        business_name: request.business_name,
        country: request.country,
    };

    let result = handler.handle(cmd).await?;

    let response = DetectiveResponse::from(result.detective);
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/detectives/:id - Get a profile with its resolved plan and badges
pub async fn get_detective(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.get_detective_handler();
    let query = GetDetectiveQuery {
        detective_id: DetectiveId::from_uuid(id),
    };

    let result = handler.handle(query).await?;

    Ok(Json(ProfileResponse::from(result)))
}

/// GET /api/detectives - Ranked public directory listing
pub async fn list_directory(
    State(state): State<AppState>,
    Query(query): Query<DirectoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = state.directory_limits.clamp(query.limit);

    let handler = state.rank_detectives_handler();
    let result = handler
        .handle(RankDetectivesQuery {
            status: DetectiveStatus::Active,
            country: query.country,
            query: query.q,
            limit,
        })
        .await?;

    let now = Timestamp::now();
    let detectives = result
        .detectives
        .into_iter()
        .map(|entry| DirectoryEntryResponse::from_ranked(entry, &now))
        .collect();

    Ok(Json(DirectoryResponse {
        detectives,
        degraded: result.degraded,
    }))
}
