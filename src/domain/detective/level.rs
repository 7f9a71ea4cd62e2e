//! Detective experience level definitions.

use serde::{Deserialize, Serialize};

/// Experience level assigned to a detective profile.
///
/// Levels are granted by the platform as a detective completes cases
/// and verification steps. They feed directly into directory ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectiveLevel {
    /// Entry level, assigned at registration.
    Level1,

    /// Established profile with verified casework.
    Level2,

    /// Senior profile with sustained track record.
    Level3,

    /// Top level, manually vetted by the platform.
    Pro,
}

impl DetectiveLevel {
    /// Returns the display name for this level.
    pub fn display_name(&self) -> &'static str {
        match self {
            DetectiveLevel::Level1 => "Level 1",
            DetectiveLevel::Level2 => "Level 2",
            DetectiveLevel::Level3 => "Level 3",
            DetectiveLevel::Pro => "Pro",
        }
    }

    /// Returns the numeric rank of this level for comparison.
    ///
    /// Higher rank = more established.
    pub fn rank(&self) -> u8 {
        match self {
            DetectiveLevel::Level1 => 1,
            DetectiveLevel::Level2 => 2,
            DetectiveLevel::Level3 => 3,
            DetectiveLevel::Pro => 4,
        }
    }
}

impl Default for DetectiveLevel {
    fn default() -> Self {
        DetectiveLevel::Level1
    }
}

impl std::fmt::Display for DetectiveLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
