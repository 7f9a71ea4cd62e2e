//! HTTP handlers for subscription plan endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::application::{CreatePlanCommand, ListPlansQuery, UpdatePlanCommand};
use crate::domain::foundation::PlanId;

use super::dto::{
    CreatePlanRequest, ListPlansParams, ListPlansResponse, PlanResponse, UpdatePlanRequest,
};

/// GET /api/plans - List subscription plans
pub async fn list_plans(
    State(state): State<AppState>,
    Query(params): Query<ListPlansParams>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.list_plans_handler();
    let query = ListPlansQuery {
        active_only: !params.include_inactive,
    };

    let result = handler.handle(query).await?;

    let response = ListPlansResponse {
        plans: result.plans.into_iter().map(PlanResponse::from).collect(),
    };
    Ok(Json(response))
}

/// POST /admin/plans - Create a new plan
pub async fn create_plan(
    State(state): State<AppState>,
    Json(request): Json<CreatePlanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.create_plan_handler();
    let cmd = CreatePlanCommand {
        name: request.name,
        display_name: request.display_name,
        monthly_price_cents: request.monthly_price_cents,
        yearly_price_cents: request.yearly_price_cents,
        service_limit: request.service_limit,
        features: request.features,
        badges: request.badges,
    };

    let result = handler.handle(cmd).await?;

    Ok((StatusCode::CREATED, Json(PlanResponse::from(result.plan))))
}

/// PATCH /admin/plans/:id - Update an existing plan
pub async fn update_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePlanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.update_plan_handler();
    let cmd = UpdatePlanCommand {
        plan_id: PlanId::from_uuid(id),
        display_name: request.display_name,
        monthly_price_cents: request.monthly_price_cents,
        yearly_price_cents: request.yearly_price_cents,
        service_limit: request.service_limit,
        features: request.features,
        badges: request.badges,
        is_active: request.is_active,
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(PlanResponse::from(result.plan)))
}
