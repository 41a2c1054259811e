//! Tests for broadcast error types.

use super::*;

#[test]
fn test_interval_too_short_message() {
    let error = BroadcastError::IntervalTooShort { interval_ms: 500 };

    assert_eq!(
        error.to_string(),
        "Specified rate of stats-broadcast is too fast: 500ms"
    );
}

#[test]
fn test_rejected_message_includes_status() {
    let error = BroadcastError::Rejected {
        endpoint: "https://collector.example/v1".to_string(),
        status: 503,
    };

    let message = error.to_string();
    assert!(message.contains("https://collector.example/v1"));
    assert!(message.contains("503"));
}

#[test]
fn test_publish_wraps_serde_error() {
    let serde_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();

    let error = BroadcastError::from(serde_error);

    assert!(matches!(error, BroadcastError::Publish(_)));
}
