//! Background scheduler configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration for the periodic maintenance loop.
///
/// Each tick applies due plan downgrades, expires lapsed subscriptions,
/// and optionally refreshes stored visibility scores.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Whether the loop runs at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Seconds between ticks
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Whether a tick also refreshes visibility score snapshots
    #[serde(default)]
    pub refresh_scores: bool,

    /// Profiles refreshed per tick when `refresh_scores` is on
    #[serde(default = "default_refresh_limit")]
    pub refresh_limit: u32,
}

impl SchedulerConfig {
    /// Get the tick interval as a Duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Validate scheduler configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval_secs == 0 {
            return Err(ValidationError::InvalidSchedulerInterval);
        }
        if self.refresh_scores && self.refresh_limit == 0 {
            return Err(ValidationError::InvalidRefreshLimit);
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_secs: default_interval(),
            refresh_scores: false,
            refresh_limit: default_refresh_limit(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_interval() -> u64 {
    3600
}

fn default_refresh_limit() -> u32 {
    500
}
