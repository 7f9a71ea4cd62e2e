//! Axum router configuration for subscription administration endpoints.

use axum::routing::post;
use axum::Router;

use super::handlers::{
    activate_subscription, apply_due_downgrades, run_expiry_sweep, schedule_downgrade,
};
use crate::adapters::http::state::AppState;

/// Create the subscription admin router.
///
/// # Routes
///
/// - `POST /detectives/:id/subscription` - Activate a plan on a profile
/// - `POST /detectives/:id/subscription/downgrade` - Schedule a plan switch
/// - `POST /subscriptions/expire` - Run the expiry sweep now
/// - `POST /subscriptions/pending/apply` - Apply due plan switches now
pub fn subscription_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/detectives/:id/subscription", post(activate_subscription))
        .route(
            "/detectives/:id/subscription/downgrade",
            post(schedule_downgrade),
        )
        .route("/subscriptions/expire", post(run_expiry_sweep))
        .route("/subscriptions/pending/apply", post(apply_due_downgrades))
}
