//! Plan catalog handlers.
//!
//! Query and command handlers for the subscription plan catalog including:
//!
//! ## Queries
//! - Listing the catalog (pricing pages, admin views)
//!
//! ## Commands
//! - Admin creation and patching of plans

mod create_plan;
mod list_plans;
mod update_plan;

// Queries
pub use list_plans::{ListPlansHandler, ListPlansQuery, ListPlansResult};

// Commands
pub use create_plan::{CreatePlanCommand, CreatePlanHandler, CreatePlanResult};
pub use update_plan::{UpdatePlanCommand, UpdatePlanHandler, UpdatePlanResult};
