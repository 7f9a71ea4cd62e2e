//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod detective;
pub mod entitlements;
pub mod plan;
pub mod ranking;
pub mod subscription;

pub use detective::{
    GetDetectiveHandler, GetDetectiveQuery, GetDetectiveResult, RegisterDetectiveCommand,
    RegisterDetectiveHandler, RegisterDetectiveResult,
};
pub use entitlements::{
    ApplyEntitlementsCommand, ApplyEntitlementsHandler, ApplyEntitlementsResult,
};
pub use plan::{
    CreatePlanCommand, CreatePlanHandler, CreatePlanResult, ListPlansHandler, ListPlansQuery,
    ListPlansResult, UpdatePlanCommand, UpdatePlanHandler, UpdatePlanResult,
};
pub use ranking::{
    EnsureVisibilityCommand, EnsureVisibilityHandler, EnsureVisibilityResult,
    RankDetectivesHandler, RankDetectivesQuery, RankDetectivesResult, RankedDetective,
    RecalculateVisibilityCommand, RecalculateVisibilityHandler, RecalculateVisibilityResult,
    RefreshVisibilityScoresCommand, RefreshVisibilityScoresHandler, RefreshVisibilityScoresResult,
    UpdateVisibilityCommand, UpdateVisibilityHandler, UpdateVisibilityResult,
};
pub use subscription::{
    ActivateSubscriptionCommand, ActivateSubscriptionHandler, ActivateSubscriptionResult,
    ApplyPendingDowngradeCommand, ApplyPendingDowngradeHandler, ApplyPendingDowngradeResult,
    ExpireSubscriptionsHandler, PendingDowngradeReport, ScheduleDowngradeCommand,
    ScheduleDowngradeHandler, ScheduleDowngradeResult, SweepReport,
};
