//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresDetectiveRepository` - Detective profile and subscription storage
//! - `PostgresPlanRepository` - Subscription plan storage
//! - `PostgresVisibilityRepository` - Directory visibility settings and scores
//! - `PostgresCatalogReader` - Batch reads over services and reviews

mod catalog_reader;
mod detective_repository;
mod plan_repository;
mod visibility_repository;

pub use catalog_reader::PostgresCatalogReader;
pub use detective_repository::PostgresDetectiveRepository;
pub use plan_repository::PostgresPlanRepository;
pub use visibility_repository::PostgresVisibilityRepository;
