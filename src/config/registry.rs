//! Application registry configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Registry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// How long a short id resolves after creation
    #[serde(default = "default_callback_retention")]
    pub callback_retention_hours: u64,

    /// How often expired short ids are purged
    #[serde(default = "default_purge_interval")]
    pub purge_interval_secs: u64,
}

impl RegistryConfig {
    pub fn callback_retention(&self) -> Duration {
        Duration::from_secs(self.callback_retention_hours * 3600)
    }

    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge_interval_secs)
    }

    /// Validate registry configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.callback_retention_hours == 0 {
            return Err(ValidationError::MustBePositive("registry.callback_retention_hours"));
        }
        if self.purge_interval_secs == 0 {
            return Err(ValidationError::MustBePositive("registry.purge_interval_secs"));
        }
        Ok(())
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            callback_retention_hours: default_callback_retention(),
            purge_interval_secs: default_purge_interval(),
        }
    }
}

fn default_callback_retention() -> u64 {
    24
}

fn default_purge_interval() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_config_defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.callback_retention(), Duration::from_secs(86_400));
        assert_eq!(config.purge_interval(), Duration::from_secs(3600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_purge_interval_is_rejected() {
        let config = RegistryConfig {
            purge_interval_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
