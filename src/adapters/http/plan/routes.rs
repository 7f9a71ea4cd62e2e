//! Axum router configuration for plan endpoints.

use axum::routing::{get, patch, post};
use axum::Router;

use super::handlers::{create_plan, list_plans, update_plan};
use crate::adapters::http::state::AppState;

/// Create the public plan router.
///
/// # Routes
///
/// - `GET /` - List plans (active only unless `include_inactive=true`)
pub fn plan_routes() -> Router<AppState> {
    Router::new().route("/", get(list_plans))
}

/// Create the admin plan router.
///
/// # Routes
///
/// - `POST /` - Create a new plan
/// - `PATCH /:id` - Update an existing plan
pub fn plan_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_plan))
        .route("/:id", patch(update_plan))
}
