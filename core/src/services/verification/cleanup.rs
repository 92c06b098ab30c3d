//! Cleanup service for periodic removal of dead verification records
//!
//! Dead records (consumed or expired) carry no request-path meaning; this
//! sweep is pure garbage collection and never runs inside a request. Row
//! deletes and the single-row state updates performed by validation go
//! through the store's native atomicity, so the sweep can run concurrently
//! with issuance and verification.

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::errors::DomainResult;
use crate::repositories::verification::VerificationRepository;

/// Configuration for the cleanup service
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600, // Run every hour
            enabled: true,
        }
    }
}

/// Service for deleting consumed and expired verification records
pub struct CleanupService<R: VerificationRepository + 'static> {
    repository: Arc<R>,
    config: CleanupConfig,
}

impl<R: VerificationRepository> CleanupService<R> {
    /// Create a new cleanup service
    pub fn new(repository: Arc<R>, config: CleanupConfig) -> Self {
        Self { repository, config }
    }

    /// Run a single cleanup cycle
    ///
    /// Deletes every record that is consumed or past its expiry; records
    /// that are both unconsumed and unexpired are left untouched.
    pub async fn run_cleanup(&self) -> DomainResult<CleanupResult> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let deleted = self.repository.purge_dead(Utc::now()).await?;

        if deleted > 0 {
            info!(deleted, "Deleted dead verification records");
        }

        Ok(CleanupResult {
            records_deleted: deleted,
        })
    }

    /// Start the cleanup service as a background task
    ///
    /// Spawns a tokio task that runs cleanup at regular intervals,
    /// independent of request traffic.
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("Verification record cleanup is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        tokio::spawn(async move {
            info!(
                "Verification cleanup started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_cleanup().await {
                    error!("Verification cleanup cycle failed: {}", e);
                }
            }
        });
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of dead records deleted
    pub records_deleted: u64,
}
