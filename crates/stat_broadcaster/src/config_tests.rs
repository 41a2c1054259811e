//! Tests for broadcast configuration.

use super::*;

fn interval() -> Duration {
    Duration::from_secs(30)
}

#[test]
fn test_valid_https_config() {
    let config =
        BroadcastConfig::new("https://collector.example/v1/metrics", BTreeMap::new(), interval())
            .unwrap();

    assert_eq!(config.endpoint().as_str(), "https://collector.example/v1/metrics");
    assert_eq!(config.interval(), interval());
    assert!(config.headers().is_empty());
}

#[test]
fn test_http_scheme_is_accepted() {
    assert!(BroadcastConfig::new("http://localhost:9000/stats", BTreeMap::new(), interval()).is_ok());
}

#[test]
fn test_minimum_interval_is_accepted() {
    assert!(
        BroadcastConfig::new("http://localhost/", BTreeMap::new(), MIN_BROADCAST_INTERVAL).is_ok()
    );
}

#[test]
fn test_interval_below_floor_is_rejected() {
    let result = BroadcastConfig::new(
        "https://collector.example/",
        BTreeMap::new(),
        Duration::from_millis(19_999),
    );

    match result {
        Err(BroadcastError::IntervalTooShort { interval_ms }) => assert_eq!(interval_ms, 19_999),
        other => panic!("Expected IntervalTooShort, got {other:?}"),
    }
}

#[test]
fn test_non_http_scheme_is_rejected() {
    for endpoint in ["ftp://collector.example/", "file:///tmp/stats", "ws://collector.example/"] {
        let result = BroadcastConfig::new(endpoint, BTreeMap::new(), interval());

        assert!(
            matches!(result, Err(BroadcastError::UnsupportedScheme { .. })),
            "{endpoint} should be rejected"
        );
    }
}

#[test]
fn test_malformed_endpoint_is_rejected() {
    let result = BroadcastConfig::new("not a url", BTreeMap::new(), interval());

    assert!(matches!(result, Err(BroadcastError::InvalidEndpoint { .. })));
}

#[test]
fn test_invalid_header_is_rejected() {
    let headers = BTreeMap::from([("Bad Header".to_string(), "x".to_string())]);

    let result = BroadcastConfig::new("https://collector.example/", headers, interval());

    match result {
        Err(BroadcastError::InvalidHeader { name }) => assert_eq!(name, "Bad Header"),
        other => panic!("Expected InvalidHeader, got {other:?}"),
    }
}

#[test]
fn test_initial_delay_is_three_intervals() {
    let config = BroadcastConfig::new("https://collector.example/", BTreeMap::new(), interval())
        .unwrap();

    assert_eq!(config.initial_delay(), Duration::from_secs(90));
}

#[test]
fn test_initial_delay_saturates_for_huge_interval() {
    let config = BroadcastConfig::new(
        "https://collector.example/",
        BTreeMap::new(),
        Duration::from_secs(u64::MAX / 2),
    )
    .unwrap();

    assert_eq!(config.initial_delay(), Duration::MAX);
}

#[test]
fn test_basic_auth_header() {
    let headers = basic_auth_of("Aladdin", "open sesame");

    assert_eq!(
        headers.get("Authorization").map(String::as_str),
        Some("Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==")
    );
}
