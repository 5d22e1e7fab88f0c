//! Error types for record access and store adapters.

use std::time::Duration;

use thiserror::Error;

use super::record::UserId;

/// Errors produced by record store adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite driver failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Backend-specific failure with context.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Errors surfaced by the lock-guarded accessor.
///
/// Every variant is returned after the lock guard has been dropped.
#[derive(Debug, Error)]
pub enum AccessError {
    /// No record exists for the identifier.
    #[error("user {0} not found")]
    NotFound(UserId),
    /// The store adapter failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// The caller's interrupt flag was raised while waiting or reading.
    #[error("interrupted while accessing user record")]
    Interrupted,
    /// Lock acquisition exceeded the configured bound.
    #[error("lock acquisition timed out after {0:?}")]
    Timeout(Duration),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
