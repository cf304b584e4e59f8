//! Tests for store error construction and conversions.

use super::*;

#[test]
fn display_includes_underlying_message() {
    let err = StoreError::new("connection refused");

    assert_eq!(err.to_string(), "store error: connection refused");
    assert_eq!(err.message(), "connection refused");
}

#[test]
fn converts_from_redis_error() {
    let redis_err = redis::RedisError::from((redis::ErrorKind::IoError, "broken pipe"));

    let err = StoreError::from(redis_err);

    assert!(
        err.message().contains("broken pipe"),
        "redis failure text should be preserved, got: {}",
        err.message()
    );
}

#[test]
fn errors_with_same_message_compare_equal() {
    assert_eq!(StoreError::new("x"), StoreError::new("x"));
    assert_ne!(StoreError::new("x"), StoreError::new("y"));
}
