//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - Repository and reader implementations over sqlx
//! - `http` - REST API surface built on axum

pub mod http;
pub mod postgres;
