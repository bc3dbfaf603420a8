//! Analysis webhook configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::is_http_url;

/// Analysis collaborator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Workflow webhook receiving `{extractedText, filename, ...}`
    pub webhook_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl AnalysisConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if the webhook is configured
    pub fn is_configured(&self) -> bool {
        self.webhook_url.as_ref().is_some_and(|u| !u.trim().is_empty())
    }

    /// Validate analysis configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout("analysis"));
        }
        if self.is_configured() && !self.webhook_url.as_deref().is_some_and(is_http_url) {
            return Err(ValidationError::InvalidUrl("analysis.webhook_url"));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    90
}
