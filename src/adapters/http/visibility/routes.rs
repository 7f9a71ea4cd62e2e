//! Axum router configuration for visibility administration endpoints.

use axum::routing::{patch, post};
use axum::Router;

use super::handlers::{recalculate_visibility, refresh_scores, update_visibility};
use crate::adapters::http::state::AppState;

/// Create the visibility admin router.
///
/// # Routes
///
/// - `PATCH /detectives/:id/visibility` - Patch visibility settings
/// - `POST /detectives/:id/visibility/recalculate` - Recompute one score snapshot
/// - `POST /visibility/refresh` - Recompute score snapshots in bulk
pub fn visibility_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/detectives/:id/visibility", patch(update_visibility))
        .route(
            "/detectives/:id/visibility/recalculate",
            post(recalculate_visibility),
        )
        .route("/visibility/refresh", post(refresh_scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::state::test_support::test_state;

    #[test]
    fn visibility_admin_routes_creates_router() {
        let router = visibility_admin_routes();
        let _: Router<()> = router.with_state(test_state());
    }
}
