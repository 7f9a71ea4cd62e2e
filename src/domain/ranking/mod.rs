//! Directory ranking domain module.
//!
//! Pure scoring rules for the public detective directory.
//!
//! # Module Structure
//!
//! - `score` - visibility score computation
//! - `stats` - review aggregates and their fold across listings

mod score;
mod stats;

pub use score::visibility_score;
pub use stats::{fold_review_stats, ReviewStats, ServiceRef, ServiceReviewStats};
