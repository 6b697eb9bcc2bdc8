//! Indexer run monitoring.
//!
//! A newly created indexer starts its first run immediately. The monitor polls
//! the indexer status until that run reaches a terminal state.

use std::time::Duration;

use search_provisioner_repository::{ProvisioningError, ProvisioningService};
use search_provisioner_shared::{IndexerStatus, RunStatus};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, instrument, warn};

/// Default delay between two status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default time to wait for the run to finish.
pub const DEFAULT_MONITOR_TIMEOUT: Duration = Duration::from_secs(300);

/// Number of item errors quoted in a failure message.
const MAX_REPORTED_ITEM_ERRORS: usize = 3;

/// Configuration for the indexer monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_MONITOR_TIMEOUT,
        }
    }
}

/// Polls an indexer until its current run finishes.
pub struct IndexerMonitor {
    config: MonitorConfig,
}

impl IndexerMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self { config }
    }

    /// Wait for the indexer's current run to finish.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexerStatus)` - The final status once the run succeeded
    /// * `Err(ProvisioningError::IndexerRunFailed)` - If the run or the indexer failed
    /// * `Err(ProvisioningError::MonitorTimeout)` - If no terminal state was reached in time
    #[instrument(skip(self, service))]
    pub async fn wait_for_completion(
        &self,
        service: &ProvisioningService,
        indexer: &str,
    ) -> Result<IndexerStatus, ProvisioningError> {
        let started = Instant::now();

        loop {
            let status = service.indexer_status(indexer).await?;

            if Self::evaluate(indexer, &status)? {
                if let Some(result) = &status.last_result {
                    info!(
                        indexer = %indexer,
                        items_processed = result.items_processed,
                        items_failed = result.items_failed,
                        "Indexer run completed"
                    );
                }
                return Ok(status);
            }

            let waited = started.elapsed();
            if waited >= self.config.timeout {
                warn!(
                    indexer = %indexer,
                    waited_secs = waited.as_secs(),
                    "Indexer run did not finish in time"
                );
                return Err(ProvisioningError::MonitorTimeout {
                    indexer: indexer.to_string(),
                    waited_secs: waited.as_secs(),
                });
            }

            debug!(
                indexer = %indexer,
                run_status = ?status.last_run_status(),
                "Indexer run still in progress"
            );
            sleep(self.config.poll_interval).await;
        }
    }

    /// Decide whether polling can stop.
    ///
    /// Returns `Ok(true)` on success, `Ok(false)` while the run is pending and
    /// an error when the run or the indexer failed.
    pub fn evaluate(indexer: &str, status: &IndexerStatus) -> Result<bool, ProvisioningError> {
        let last = status.last_result.as_ref();

        if status.is_error() {
            return Err(ProvisioningError::IndexerRunFailed {
                indexer: indexer.to_string(),
                status: status.status.clone(),
                message: last
                    .and_then(|r| r.error_message.clone())
                    .unwrap_or_else(|| "indexer reported an error status".to_string()),
            });
        }

        let Some(last) = last else {
            return Ok(false);
        };

        if !last.status.is_terminal() {
            return Ok(false);
        }

        match last.status {
            RunStatus::Success => Ok(true),
            failed => {
                let mut message = last
                    .error_message
                    .clone()
                    .unwrap_or_else(|| format!("{} item(s) failed", last.items_failed));
                let item_errors: Vec<String> = last
                    .errors
                    .iter()
                    .take(MAX_REPORTED_ITEM_ERRORS)
                    .map(|e| {
                        format!(
                            "{}: {}",
                            e.key.as_deref().unwrap_or("<no key>"),
                            e.error_message.as_deref().unwrap_or("<no message>")
                        )
                    })
                    .collect();
                if !item_errors.is_empty() {
                    message = format!("{} ({})", message, item_errors.join("; "));
                }

                Err(ProvisioningError::IndexerRunFailed {
                    indexer: indexer.to_string(),
                    status: failed.to_string(),
                    message,
                })
            }
        }
    }
}
