//! Detective domain module.
//!
//! The investigator profile aggregate and its supporting enums.
//!
//! # Module Structure
//!
//! - `aggregate` - Detective aggregate entity
//! - `level` - DetectiveLevel experience tiers
//! - `status` - DetectiveStatus moderation states

mod aggregate;
mod level;
mod status;

pub use aggregate::Detective;
pub use level::DetectiveLevel;
pub use status::DetectiveStatus;
