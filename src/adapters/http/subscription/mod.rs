//! HTTP adapter for subscription administration endpoints.
//!
//! Activation, downgrade scheduling, and manual triggers for the scheduled
//! passes. These routes are mounted under the admin prefix; the deployment
//! is expected to protect that prefix upstream.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::subscription_admin_routes;
