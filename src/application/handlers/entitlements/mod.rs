//! Entitlements handlers - Package-granted badge synchronization.

mod apply_entitlements;

pub use apply_entitlements::{
    ApplyEntitlementsCommand, ApplyEntitlementsHandler, ApplyEntitlementsResult,
};
