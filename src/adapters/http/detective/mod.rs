//! HTTP adapter for detective endpoints.
//!
//! Exposes profiles and the ranked directory via REST API:
//! - `GET /api/detectives` - Ranked public directory listing
//! - `POST /api/detectives` - Register a new detective profile
//! - `GET /api/detectives/:id` - Get a profile with plan and badges

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::detective_routes;
