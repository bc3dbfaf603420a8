//! Upload storage configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;
use super::is_http_url;

/// Storage configuration for raw uploads
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding uploaded files
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Public base URL used to build download links
    pub public_base_url: Option<String>,

    /// Largest accepted upload in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Age after which uploads are deleted
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u64,

    /// How often the sweeper runs
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl StorageConfig {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_hours * 3600)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_upload_bytes == 0 {
            return Err(ValidationError::MustBePositive("storage.max_upload_bytes"));
        }
        if self.retention_hours == 0 {
            return Err(ValidationError::MustBePositive("storage.retention_hours"));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ValidationError::MustBePositive("storage.sweep_interval_secs"));
        }
        if let Some(url) = self.public_base_url.as_deref().filter(|u| !u.trim().is_empty()) {
            if !is_http_url(url) {
                return Err(ValidationError::InvalidUrl("storage.public_base_url"));
            }
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            public_base_url: None,
            max_upload_bytes: default_max_upload_bytes(),
            retention_hours: default_retention_hours(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_retention_hours() -> u64 {
    24
}

fn default_sweep_interval() -> u64 {
    3600
}
