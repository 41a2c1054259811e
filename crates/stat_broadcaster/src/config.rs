//! Validated broadcast configuration.

use std::collections::BTreeMap;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{HeaderName, HeaderValue};
use url::Url;

use crate::errors::{BroadcastError, BroadcastResult};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Broadcasts may not be scheduled more often than this.
pub const MIN_BROADCAST_INTERVAL: Duration = Duration::from_secs(20);

/// Where, how often, and with which headers stats are broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastConfig {
    endpoint: Url,
    headers: BTreeMap<String, String>,
    interval: Duration,
}

impl BroadcastConfig {
    /// Validates and builds a broadcast configuration.
    ///
    /// # Errors
    ///
    /// - [`BroadcastError::InvalidEndpoint`] if `endpoint` is not a URL
    /// - [`BroadcastError::UnsupportedScheme`] unless the scheme is `http` or `https`
    /// - [`BroadcastError::IntervalTooShort`] if `interval` is below [`MIN_BROADCAST_INTERVAL`]
    /// - [`BroadcastError::InvalidHeader`] if a header name or value cannot be sent
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use stat_broadcaster::{basic_auth_of, BroadcastConfig};
    ///
    /// let config = BroadcastConfig::new(
    ///     "https://metrics.example.com/v1/metrics",
    ///     basic_auth_of("user", "secret"),
    ///     Duration::from_secs(30),
    /// )?;
    /// assert_eq!(config.interval(), Duration::from_secs(30));
    /// # Ok::<(), stat_broadcaster::BroadcastError>(())
    /// ```
    pub fn new(
        endpoint: &str,
        headers: BTreeMap<String, String>,
        interval: Duration,
    ) -> BroadcastResult<Self> {
        if interval < MIN_BROADCAST_INTERVAL {
            return Err(BroadcastError::IntervalTooShort {
                interval_ms: interval.as_millis(),
            });
        }

        let endpoint = Url::parse(endpoint).map_err(|e| BroadcastError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(BroadcastError::UnsupportedScheme {
                endpoint: endpoint.to_string(),
            });
        }

        for (name, value) in &headers {
            if HeaderName::from_bytes(name.as_bytes()).is_err()
                || HeaderValue::from_str(value).is_err()
            {
                return Err(BroadcastError::InvalidHeader { name: name.clone() });
            }
        }

        Ok(Self {
            endpoint,
            headers,
            interval,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Delay before the first broadcast: three intervals, capped at
    /// [`Duration::MAX`].
    pub fn initial_delay(&self) -> Duration {
        self.interval.saturating_mul(3)
    }
}

/// Builds an `Authorization` header for HTTP basic authentication.
pub fn basic_auth_of(user: &str, password: &str) -> BTreeMap<String, String> {
    let credentials = STANDARD.encode(format!("{user}:{password}"));
    BTreeMap::from([(
        "Authorization".to_string(),
        format!("Basic {credentials}"),
    )])
}
