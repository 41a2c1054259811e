//! Periodic broadcasting of process stats to a remote HTTP collector.
//!
//! Use this to push stats to a collector instead of having the collector
//! pull them:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use stat_broadcaster::{basic_auth_of, BroadcastConfig, JsonPublisher, StatBroadcaster, StatsSnapshot};
//!
//! # async fn run() -> Result<(), stat_broadcaster::BroadcastError> {
//! let config = BroadcastConfig::new(
//!     "https://metrics.example.com/v1/metrics",
//!     basic_auth_of("user", "secret"),
//!     Duration::from_secs(30),
//! )?;
//! let provider = Arc::new(|| StatsSnapshot::new());
//! let handle = StatBroadcaster::new(config, provider, Arc::new(JsonPublisher)).start();
//! # handle.stop();
//! # Ok(())
//! # }
//! ```

pub mod broadcaster;
pub mod config;
pub mod errors;
pub mod publisher;

pub use broadcaster::{BroadcastHandle, StatBroadcaster};
pub use config::{basic_auth_of, BroadcastConfig, MIN_BROADCAST_INTERVAL};
pub use errors::{BroadcastError, BroadcastResult};
pub use publisher::{JsonPublisher, SnapshotProvider, StatsPublisher, StatsSnapshot};
