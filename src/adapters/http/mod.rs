//! HTTP adapters - REST API implementations.
//!
//! Each area has its own directory with DTOs, handlers, and routes; the
//! routers compose here. Public routes mount under `/api`, admin routes
//! under `/api/admin` behind whatever protection the deployment provides.

pub mod detective;
pub mod error;
pub mod plan;
pub mod state;
pub mod subscription;
pub mod visibility;

pub use detective::detective_routes;
pub use error::ApiError;
pub use plan::{plan_admin_routes, plan_routes};
pub use state::{AppState, DirectoryLimits};
pub use subscription::subscription_admin_routes;
pub use visibility::visibility_admin_routes;

use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

/// Public API router: registration, profiles, directory, plan catalog.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/detectives", detective_routes())
        .nest("/plans", plan_routes())
}

/// Admin router: plan CRUD, subscription control, visibility curation.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .nest("/plans", plan_admin_routes())
        .merge(subscription_admin_routes())
        .merge(visibility_admin_routes())
}

/// Full application router with the health probe at the root.
pub fn app_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_router())
        .nest("/api/admin", admin_router())
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
