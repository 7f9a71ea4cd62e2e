//! Detective profile handlers.
//!
//! Command and query handlers for profile lifecycle including:
//!
//! ## Queries
//! - Loading a profile with resolved badges and service limits
//!
//! ## Commands
//! - Registering a new profile on the free plan

mod get_detective;
mod register_detective;

// Queries
pub use get_detective::{GetDetectiveHandler, GetDetectiveQuery, GetDetectiveResult};

// Commands
pub use register_detective::{
    RegisterDetectiveCommand, RegisterDetectiveHandler, RegisterDetectiveResult,
};
