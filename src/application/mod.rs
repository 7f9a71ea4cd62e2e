//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers
//! (read); scheduled passes reuse the same handlers the HTTP surface calls.

pub mod free_plan;
pub mod handlers;

pub use free_plan::FreePlanService;
pub use handlers::{
    // Detective handlers
    GetDetectiveHandler, GetDetectiveQuery, GetDetectiveResult,
    RegisterDetectiveCommand, RegisterDetectiveHandler, RegisterDetectiveResult,
    // Entitlement handlers
    ApplyEntitlementsCommand, ApplyEntitlementsHandler, ApplyEntitlementsResult,
    // Plan handlers
    CreatePlanCommand, CreatePlanHandler, CreatePlanResult,
    ListPlansHandler, ListPlansQuery, ListPlansResult,
    UpdatePlanCommand, UpdatePlanHandler, UpdatePlanResult,
    // Ranking handlers
    EnsureVisibilityCommand, EnsureVisibilityHandler, EnsureVisibilityResult,
    RankDetectivesHandler, RankDetectivesQuery, RankDetectivesResult, RankedDetective,
    RecalculateVisibilityCommand, RecalculateVisibilityHandler, RecalculateVisibilityResult,
    RefreshVisibilityScoresCommand, RefreshVisibilityScoresHandler, RefreshVisibilityScoresResult,
    UpdateVisibilityCommand, UpdateVisibilityHandler, UpdateVisibilityResult,
    // Subscription handlers
    ActivateSubscriptionCommand, ActivateSubscriptionHandler, ActivateSubscriptionResult,
    ApplyPendingDowngradeCommand, ApplyPendingDowngradeHandler, ApplyPendingDowngradeResult,
    ExpireSubscriptionsHandler, PendingDowngradeReport,
    ScheduleDowngradeCommand, ScheduleDowngradeHandler, ScheduleDowngradeResult, SweepReport,
};
