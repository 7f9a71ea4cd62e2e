//! HTTP adapter for subscription plan endpoints.
//!
//! Exposes the plan catalog via REST API:
//! - `GET /api/plans` - List plans
//! - `POST /admin/plans` - Create a plan
//! - `PATCH /admin/plans/:id` - Update a plan

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{plan_admin_routes, plan_routes};
