//! ShortIdPurger - Background purge of expired callback correlation entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::domain::foundation::Timestamp;
use crate::ports::ApplicationRegistry;

/// Background service that calls `purge_expired` on a fixed interval.
///
/// Applications are never touched; only their short-id entries age out.
pub struct ShortIdPurger {
    registry: Arc<dyn ApplicationRegistry>,
    interval: Duration,
}

impl ShortIdPurger {
    pub fn new(registry: Arc<dyn ApplicationRegistry>, interval: Duration) -> Self {
        Self { registry, interval }
    }

    /// Run the purge loop until the shutdown signal is received.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::debug!("Short id purger stopping");
                        return;
                    }
                }

                _ = interval.tick() => {
                    self.purge_once().await;
                }
            }
        }
    }

    /// Run exactly one purge cycle.
    pub async fn purge_once(&self) -> usize {
        let removed = self.registry.purge_expired(Timestamp::now()).await;
        if removed > 0 {
            tracing::info!(removed, "Purged expired short ids");
        }
        removed
    }
}
