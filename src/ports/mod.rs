//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Repository Ports
//!
//! - `DetectiveRepository` - Detective aggregate persistence
//! - `PlanRepository` - SubscriptionPlan persistence
//! - `VisibilityRepository` - VisibilityRecord persistence
//!
//! ## Read Ports
//!
//! - `CatalogReader` - Batched service and review aggregates for ranking

mod catalog_reader;
mod detective_repository;
mod plan_repository;
mod visibility_repository;

pub use catalog_reader::CatalogReader;
pub use detective_repository::{DetectiveRepository, DirectoryFilter};
pub use plan_repository::PlanRepository;
pub use visibility_repository::VisibilityRepository;
