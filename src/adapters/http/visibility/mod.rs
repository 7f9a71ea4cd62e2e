//! HTTP adapter for visibility administration endpoints.
//!
//! Curation controls over the public directory: hide or feature a profile,
//! pin a manual rank, and refresh stored score snapshots. Mounted under the
//! admin prefix; the deployment is expected to protect that prefix upstream.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::visibility_admin_routes;
