//! Ranking handlers.
//!
//! Query and command handlers for the public directory ranking including:
//!
//! ## Queries
//! - Ranked directory pages (batched loads, in-memory scoring)
//!
//! ## Commands
//! - Ensuring a profile's visibility row exists
//! - Admin visibility patches (hide, feature, manual rank)
//! - Recomputing stored score snapshots, singly or in bulk

mod ensure_visibility;
mod rank_detectives;
mod recalculate_visibility;
mod refresh_visibility_scores;
mod update_visibility;

// Queries
pub use rank_detectives::{
    RankDetectivesHandler, RankDetectivesQuery, RankDetectivesResult, RankedDetective,
};

// Commands
pub use ensure_visibility::{EnsureVisibilityCommand, EnsureVisibilityHandler, EnsureVisibilityResult};
pub use recalculate_visibility::{
    RecalculateVisibilityCommand, RecalculateVisibilityHandler, RecalculateVisibilityResult,
};
pub use refresh_visibility_scores::{
    RefreshVisibilityScoresCommand, RefreshVisibilityScoresHandler, RefreshVisibilityScoresResult,
};
pub use update_visibility::{UpdateVisibilityCommand, UpdateVisibilityHandler, UpdateVisibilityResult};
