//! Directory visibility domain module.
//!
//! # Module Structure
//!
//! - `record` - VisibilityRecord entity and VisibilityPatch

mod record;

pub use record::{VisibilityPatch, VisibilityRecord};
