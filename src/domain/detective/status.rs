//! Detective profile status definitions.

use serde::{Deserialize, Serialize};

/// Moderation status of a detective profile.
///
/// Only `Active` profiles appear in the public directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectiveStatus {
    /// Approved and publicly listed.
    Active,

    /// Registered, awaiting moderation.
    Pending,

    /// Temporarily removed by the platform.
    Suspended,

    /// Deactivated by the owner.
    Inactive,
}

impl DetectiveStatus {
    /// Returns true if the profile is publicly listed.
    pub fn is_listed(&self) -> bool {
        matches!(self, DetectiveStatus::Active)
    }

    /// Returns the display name for this status.
    pub fn display_name(&self) -> &'static str {
        match self {
            DetectiveStatus::Active => "Active",
            DetectiveStatus::Pending => "Pending",
            DetectiveStatus::Suspended => "Suspended",
            DetectiveStatus::Inactive => "Inactive",
        }
    }
}

impl Default for DetectiveStatus {
    fn default() -> Self {
        DetectiveStatus::Pending
    }
}

impl std::fmt::Display for DetectiveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
