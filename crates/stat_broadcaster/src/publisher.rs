//! Stats snapshots and their wire encodings.

use std::collections::BTreeMap;

use crate::errors::BroadcastResult;

#[cfg(test)]
#[path = "publisher_tests.rs"]
mod tests;

/// A point-in-time view of the process stats, keyed by stat name.
pub type StatsSnapshot = BTreeMap<String, serde_json::Value>;

/// Supplies the current stats snapshot on every broadcast tick.
pub trait SnapshotProvider: Send + Sync {
    fn snapshot(&self) -> StatsSnapshot;
}

impl<F> SnapshotProvider for F
where
    F: Fn() -> StatsSnapshot + Send + Sync,
{
    fn snapshot(&self) -> StatsSnapshot {
        self()
    }
}

/// Serializes a snapshot into a request body.
pub trait StatsPublisher: Send + Sync {
    /// Value of the request's `Content-Type` header.
    fn content_type(&self) -> &str;

    /// Encodes `snapshot` into the request body.
    fn publish(&self, snapshot: &StatsSnapshot) -> BroadcastResult<Vec<u8>>;
}

/// Publishes snapshots as a flat JSON object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPublisher;

impl StatsPublisher for JsonPublisher {
    fn content_type(&self) -> &str {
        "application/json"
    }

    fn publish(&self, snapshot: &StatsSnapshot) -> BroadcastResult<Vec<u8>> {
        Ok(serde_json::to_vec(snapshot)?)
    }
}
