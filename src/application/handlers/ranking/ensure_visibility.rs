//! EnsureVisibilityHandler - Lazily creates a profile's visibility row.
//!
//! Visibility rows are created on first touch rather than by migration, so
//! registration and admin tooling both funnel through this handler. Safe to
//! call any number of times.

use std::sync::Arc;

use crate::domain::foundation::{DetectiveId, DomainError, Timestamp};
use crate::domain::visibility::VisibilityRecord;
use crate::ports::VisibilityRepository;

/// Command to guarantee a visibility row exists.
#[derive(Debug, Clone)]
pub struct EnsureVisibilityCommand {
    pub detective_id: DetectiveId,
}

/// Result carrying the row as stored after the call.
#[derive(Debug, Clone)]
pub struct EnsureVisibilityResult {
    pub record: VisibilityRecord,
}

/// Handler that inserts default visibility settings when missing.
pub struct EnsureVisibilityHandler {
    visibility: Arc<dyn VisibilityRepository>,
}

impl EnsureVisibilityHandler {
    pub fn new(visibility: Arc<dyn VisibilityRepository>) -> Self {
        Self { visibility }
    }

    pub async fn handle(
        &self,
        cmd: EnsureVisibilityCommand,
    ) -> Result<EnsureVisibilityResult, DomainError> {
        let defaults = VisibilityRecord::with_defaults(cmd.detective_id, Timestamp::now());

        // The insert never overwrites an existing row
        self.visibility.ensure(&defaults).await?;

        let record = self
            .visibility
            .find_by_detective(&cmd.detective_id)
            .await?
            .unwrap_or(defaults);

        Ok(EnsureVisibilityResult { record })
    }
}
