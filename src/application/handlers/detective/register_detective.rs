//! RegisterDetectiveHandler - Creates a detective profile.
//!
//! Every profile starts on the free plan with a default visibility row, so
//! the directory and the scheduled passes never meet a profile in a
//! half-initialized state.

use std::sync::Arc;

use tracing::info;

use crate::application::free_plan::FreePlanService;
use crate::domain::detective::Detective;
use crate::domain::foundation::{DetectiveId, DomainError, Timestamp, UserId, ValidationError};
use crate::domain::visibility::VisibilityRecord;
use crate::ports::{DetectiveRepository, VisibilityRepository};

/// Command to register a new detective profile.
#[derive(Debug, Clone)]
pub struct RegisterDetectiveCommand {
    pub user_id: UserId,
    pub business_name: Option<String>,
    pub country: String,
}

/// Result of a registration.
#[derive(Debug, Clone)]
pub struct RegisterDetectiveResult {
    pub detective: Detective,
}

/// Handler that registers a detective profile.
pub struct RegisterDetectiveHandler {
    detectives: Arc<dyn DetectiveRepository>,
    visibility: Arc<dyn VisibilityRepository>,
    free_plans: Arc<FreePlanService>,
}

impl RegisterDetectiveHandler {
    pub fn new(
        detectives: Arc<dyn DetectiveRepository>,
        visibility: Arc<dyn VisibilityRepository>,
        free_plans: Arc<FreePlanService>,
    ) -> Self {
        Self {
            detectives,
            visibility,
            free_plans,
        }
    }

    pub async fn handle(
        &self,
        cmd: RegisterDetectiveCommand,
    ) -> Result<RegisterDetectiveResult, DomainError> {
        // 1. Validate input
        let country = cmd.country.trim().to_string();
        if country.is_empty() {
            return Err(ValidationError::empty_field("country").into());
        }
        let business_name = cmd
            .business_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        // 2. New profiles always start on the free plan
        let free_plan_id = self.free_plans.free_plan_id().await?;

        // 3. Create the profile
        let now = Timestamp::now();
        let detective = Detective::register(
            DetectiveId::new(),
            cmd.user_id,
            business_name,
            country,
            free_plan_id,
            now,
        );
        self.detectives.create(&detective).await?;

        // 4. Seed the visibility row the ranking passes read
        self.visibility
            .ensure(&VisibilityRecord::with_defaults(detective.id, now))
            .await?;

        info!(
            detective_id = %detective.id,
            user_id = %detective.user_id,
            country = %detective.country,
            "Registered detective profile"
        );

        Ok(RegisterDetectiveResult { detective })
    }
}
