//! Periodic stats broadcasting over HTTP.
//!
//! A [`StatBroadcaster`] POSTs the current stats snapshot to a remote
//! collector. Once started, the first broadcast happens after three
//! intervals and the next ones a full interval after the previous one
//! finished. Failed broadcasts are logged and never stop the schedule.

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn, Instrument};

use crate::config::BroadcastConfig;
use crate::errors::{BroadcastError, BroadcastResult};
use crate::publisher::{SnapshotProvider, StatsPublisher};

#[cfg(test)]
#[path = "broadcaster_tests.rs"]
mod tests;

/// Sends stats snapshots to the configured endpoint.
pub struct StatBroadcaster {
    config: BroadcastConfig,
    provider: Arc<dyn SnapshotProvider>,
    publisher: Arc<dyn StatsPublisher>,
    client: reqwest::Client,
}

impl StatBroadcaster {
    pub fn new(
        config: BroadcastConfig,
        provider: Arc<dyn SnapshotProvider>,
        publisher: Arc<dyn StatsPublisher>,
    ) -> Self {
        Self {
            config,
            provider,
            publisher,
            client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &BroadcastConfig {
        &self.config
    }

    /// Performs a single broadcast.
    ///
    /// # Errors
    ///
    /// - [`BroadcastError::Publish`] if the snapshot cannot be encoded
    /// - [`BroadcastError::Transport`] if the request cannot be delivered
    /// - [`BroadcastError::Rejected`] if the collector answers with a non-2xx status
    pub async fn broadcast_once(&self) -> BroadcastResult<StatusCode> {
        let body = self.publisher.publish(&self.provider.snapshot())?;
        let endpoint = self.config.endpoint();

        let mut request = self
            .client
            .post(endpoint.clone())
            .header(CONTENT_TYPE, self.publisher.content_type());
        for (name, value) in self.config.headers() {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|source| BroadcastError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BroadcastError::Rejected {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        debug!(endpoint = %endpoint, status = status.as_u16(), "Broadcast stats snapshot");
        Ok(status)
    }

    /// Starts broadcasting on the current tokio runtime.
    ///
    /// Must be called from within a tokio runtime. Broadcasting continues
    /// until the returned handle is stopped or dropped.
    ///
    /// The first broadcast happens after [`BroadcastConfig::initial_delay`],
    /// then one per interval measured from the end of the previous attempt.
    /// The task runs in the caller's tracing span.
    pub fn start(self) -> BroadcastHandle {
        info!(
            endpoint = %self.config.endpoint(),
            interval_ms = self.config.interval().as_millis() as u64,
            "Starting stats broadcast"
        );

        let task = tokio::spawn(async move {
            sleep(self.config.initial_delay()).await;
            loop {
                if let Err(e) = self.broadcast_once().await {
                    warn!(error = %e, "Stats broadcast failed");
                }
                sleep(self.config.interval()).await;
            }
        }
        .in_current_span());

        BroadcastHandle { task }
    }
}

/// Controls a running broadcast schedule.
#[derive(Debug)]
pub struct BroadcastHandle {
    task: JoinHandle<()>,
}

impl BroadcastHandle {
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops the schedule. An in-flight broadcast is abandoned.
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for BroadcastHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
