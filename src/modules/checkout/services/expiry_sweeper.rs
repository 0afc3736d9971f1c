use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info};

use super::session_store::InMemorySessionStore;
use crate::core::Result;

/// Background job that purges abandoned pending payments
///
/// Entries older than the configured ttl are already ignored by the
/// coordinator; this keeps the in-memory store from growing without bound.
/// Spawn `start` as a tokio task in main.rs.
pub struct ExpirySweeper {
    store: InMemorySessionStore,
    ttl: chrono::Duration,
    period: Duration,
}

impl ExpirySweeper {
    pub fn new(store: InMemorySessionStore, ttl: chrono::Duration, period: Duration) -> Self {
        Self { store, ttl, period }
    }

    /// Run forever, sweeping once per period
    pub async fn start(self: Arc<Self>) {
        info!(
            period_secs = self.period.as_secs(),
            ttl_minutes = self.ttl.num_minutes(),
            "Starting pending payment sweeper"
        );

        let mut ticker = interval(self.period);

        loop {
            ticker.tick().await;

            match self.sweep() {
                Ok(purged) => {
                    if purged > 0 {
                        info!(purged = purged, "Purged abandoned pending payments");
                    }
                }
                Err(e) => {
                    error!(error = %e, "Error purging pending payments");
                }
            }
        }
    }

    /// Purge once, returning the number of removed entries
    pub fn sweep(&self) -> Result<usize> {
        self.store.purge_expired(self.ttl)
    }
}
