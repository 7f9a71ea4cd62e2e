//! Public directory configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Page size bounds for the public directory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    /// Page size when the request does not specify one
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Hard cap on the page size a client may request
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl DirectoryConfig {
    /// Validate directory configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(ValidationError::InvalidPageSize);
        }
        if self.default_page_size > self.max_page_size {
            return Err(ValidationError::DefaultPageSizeTooLarge);
        }
        Ok(())
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_page_size() -> u32 {
    20
}

fn default_max_page_size() -> u32 {
    50
}
