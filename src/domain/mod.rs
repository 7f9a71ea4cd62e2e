//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `detective` - Investigator profile aggregate
//! - `plan` - Subscription plans and badge flags
//! - `subscription` - Billing cycles and lifecycle errors
//! - `visibility` - Directory visibility settings
//! - `ranking` - Pure visibility scoring rules
//! - `entitlements` - Effective badge and service limit resolution

pub mod detective;
pub mod entitlements;
pub mod foundation;
pub mod plan;
pub mod ranking;
pub mod subscription;
pub mod visibility;
