//! UploadSweeper - Background cleanup of retained uploads.
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `interval` | 1h | How often the upload directory is swept |
//! | `retention` | 24h | Age after which an upload is deleted |

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::ports::{ArtifactStorage, StorageError};

/// Configuration for the UploadSweeper service.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    pub interval: Duration,
    pub retention: Duration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600),
            retention: Duration::from_secs(24 * 3600),
        }
    }
}

impl SweeperConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }
}

/// Background service that deletes uploads past their retention window.
pub struct UploadSweeper {
    storage: Arc<dyn ArtifactStorage>,
    config: SweeperConfig,
}

impl UploadSweeper {
    pub fn new(storage: Arc<dyn ArtifactStorage>, config: SweeperConfig) -> Self {
        Self { storage, config }
    }

    /// Run the sweep loop until the shutdown signal is received.
    ///
    /// A failed sweep is logged and retried on the next tick.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.interval);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::debug!("Upload sweeper stopping");
                        return;
                    }
                }

                _ = interval.tick() => {
                    if let Err(e) = self.sweep_once().await {
                        tracing::warn!(error = %e, "Upload sweep failed");
                    }
                }
            }
        }
    }

    /// Run exactly one sweep.
    pub async fn sweep_once(&self) -> Result<usize, StorageError> {
        let removed = self.storage.sweep(self.config.retention).await?;
        if removed > 0 {
            tracing::info!(removed, "Removed expired uploads");
        }
        Ok(removed)
    }
}
