//! UpdateVisibilityHandler - Admin patch of directory visibility settings.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{DetectiveId, DomainError, ErrorCode, Timestamp};
use crate::domain::visibility::{VisibilityPatch, VisibilityRecord};
use crate::ports::{DetectiveRepository, VisibilityRepository};

/// Command to patch a profile's visibility settings.
///
/// Unset patch fields are left alone; `manual_rank` distinguishes "leave",
/// "set", and "clear".
#[derive(Debug, Clone)]
pub struct UpdateVisibilityCommand {
    pub detective_id: DetectiveId,
    pub patch: VisibilityPatch,
}

/// Result carrying the settings after the patch.
#[derive(Debug, Clone)]
pub struct UpdateVisibilityResult {
    pub record: VisibilityRecord,
}

/// Handler for admin visibility updates.
///
/// Creates the row with defaults when the profile has never been
/// administered, then applies the patch on top.
pub struct UpdateVisibilityHandler {
    detectives: Arc<dyn DetectiveRepository>,
    visibility: Arc<dyn VisibilityRepository>,
}

impl UpdateVisibilityHandler {
    pub fn new(
        detectives: Arc<dyn DetectiveRepository>,
        visibility: Arc<dyn VisibilityRepository>,
    ) -> Self {
        Self {
            detectives,
            visibility,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateVisibilityCommand,
    ) -> Result<UpdateVisibilityResult, DomainError> {
        // 1. Reject patches that change nothing
        if cmd.patch.is_empty() {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                "Visibility patch contains no fields",
            ));
        }

        // 2. The profile must exist
        if self.detectives.find_by_id(&cmd.detective_id).await?.is_none() {
            return Err(DomainError::new(
                ErrorCode::DetectiveNotFound,
                format!("Detective not found: {}", cmd.detective_id),
            ));
        }

        // 3. Load current settings, defaulting for never-administered rows
        let now = Timestamp::now();
        let mut record = self
            .visibility
            .find_by_detective(&cmd.detective_id)
            .await?
            .unwrap_or_else(|| VisibilityRecord::with_defaults(cmd.detective_id, now));

        // 4. Apply and persist
        record.apply(&cmd.patch, now);
        self.visibility.upsert_settings(&record).await?;

        info!(
            detective_id = %cmd.detective_id,
            is_visible = record.is_visible,
            is_featured = record.is_featured,
            manual_rank = ?record.manual_rank,
            "Updated visibility settings"
        );

        Ok(UpdateVisibilityResult { record })
    }
}
