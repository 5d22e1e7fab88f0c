//! Tests for error types

use std::time::Duration;

use user_rwlock_service::core::{AccessError, StoreError};

#[test]
fn test_not_found_error() {
    let err = AccessError::NotFound(7);
    assert_eq!(format!("{}", err), "user 7 not found");
}

#[test]
fn test_backend_error() {
    let err = StoreError::Backend("connection failed".to_string());
    assert_eq!(format!("{}", err), "backend error: connection failed");
}

#[test]
fn test_store_error_wraps() {
    let err = AccessError::from(StoreError::Backend("disk full".to_string()));
    assert_eq!(format!("{}", err), "store error: backend error: disk full");
}

#[test]
fn test_interrupted_error() {
    let err = AccessError::Interrupted;
    assert_eq!(format!("{}", err), "interrupted while accessing user record");
}

#[test]
fn test_timeout_error() {
    let err = AccessError::Timeout(Duration::from_millis(250));
    assert_eq!(format!("{}", err), "lock acquisition timed out after 250ms");
}
