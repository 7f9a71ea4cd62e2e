//! Axum router configuration for detective endpoints.

use axum::routing::get;
use axum::Router;

use super::handlers::{get_detective, list_directory, register_detective};
use crate::adapters::http::state::AppState;

/// Create the public detective router.
///
/// # Routes
///
/// - `GET /` - Ranked public directory listing
/// - `POST /` - Register a new detective profile
/// - `GET /:id` - Get a profile with resolved plan and badges
pub fn detective_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_directory).post(register_detective))
        .route("/:id", get(get_detective))
}
