//! HTTP handlers for subscription administration endpoints.
//!
//! The sweep and pending-downgrade triggers run the same handlers the
//! scheduler runs, so an operator can force a pass without waiting for the
//! next tick.

use axum::extract::{Json, Path, State};
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::application::{ActivateSubscriptionCommand, ScheduleDowngradeCommand};
use crate::domain::foundation::{DetectiveId, PlanId};
use crate::domain::subscription::BillingCycle;

use super::dto::{
    ActivateSubscriptionRequest, ActivateSubscriptionResponse, PendingDowngradesResponse,
    ScheduleDowngradeRequest, ScheduleDowngradeResponse, SubscriptionStateResponse, SweepResponse,
};

/// POST /admin/detectives/:id/subscription - Activate a plan on a profile
pub async fn activate_subscription(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ActivateSubscriptionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let billing_cycle = BillingCycle::parse(&request.billing_cycle)?;

    let handler = state.activate_subscription_handler();
    let cmd = ActivateSubscriptionCommand {
        detective_id: DetectiveId::from_uuid(id),
        plan_id: PlanId::from_uuid(request.plan_id),
        billing_cycle,
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(ActivateSubscriptionResponse {
        subscription: SubscriptionStateResponse::from(&result.detective),
        renewed: result.renewed,
    }))
}

/// POST /admin/detectives/:id/subscription/downgrade - Schedule a plan switch
pub async fn schedule_downgrade(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ScheduleDowngradeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let billing_cycle = BillingCycle::parse(&request.billing_cycle)?;

    let handler = state.schedule_downgrade_handler();
    let cmd = ScheduleDowngradeCommand {
        detective_id: DetectiveId::from_uuid(id),
        plan_id: PlanId::from_uuid(request.plan_id),
        billing_cycle,
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(ScheduleDowngradeResponse {
        subscription: SubscriptionStateResponse::from(&result.detective),
        applied_immediately: result.applied_immediately,
        effective_at: result.effective_at.as_datetime().to_rfc3339(),
    }))
}

/// POST /admin/subscriptions/expire - Run the expiry sweep now
pub async fn run_expiry_sweep(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.expiry.sweep().await?;
    Ok(Json(SweepResponse::from(report)))
}

/// POST /admin/subscriptions/pending/apply - Apply due plan switches now
pub async fn apply_due_downgrades(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.apply_pending_downgrade_handler();
    let report = handler.run_due().await?;
    Ok(Json(PendingDowngradesResponse::from(report)))
}
