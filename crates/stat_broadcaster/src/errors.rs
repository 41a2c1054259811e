//! Error types for stats broadcasting.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors raised while configuring or performing a stats broadcast.
///
/// Configuration errors are returned from [`crate::BroadcastConfig::new`].
/// Delivery errors are returned from a single
/// [`crate::StatBroadcaster::broadcast_once`]; the scheduled loop only logs them.
#[derive(Error, Debug)]
pub enum BroadcastError {
    #[error("Invalid broadcast endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Only HTTP or HTTPS endpoints are supported: {endpoint}")]
    UnsupportedScheme { endpoint: String },

    #[error("Specified rate of stats-broadcast is too fast: {interval_ms}ms")]
    IntervalTooShort { interval_ms: u128 },

    #[error("Invalid broadcast header '{name}'")]
    InvalidHeader { name: String },

    #[error("Failed to publish stats snapshot: {0}")]
    Publish(#[from] serde_json::Error),

    #[error("Unable to broadcast stats to {endpoint}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unable to broadcast stats to {endpoint} => status: {status}")]
    Rejected { endpoint: String, status: u16 },
}

/// Result type alias for broadcast operations.
pub type BroadcastResult<T> = Result<T, BroadcastError>;
