//! Build the store and accessor described by a [`ServiceConfig`].

use crate::config::{ServiceConfig, StoreBackendConfig};
use crate::core::{DynUserStore, StoreError, UserService};
use crate::infra::store::{InMemoryUserStore, SqliteUserStore};

/// Construct the store backend selected by `cfg`.
pub fn build_store(cfg: &StoreBackendConfig) -> Result<DynUserStore, StoreError> {
    cfg.validate()
        .map_err(|e| StoreError::Backend(format!("config invalid: {e}")))?;

    match cfg {
        StoreBackendConfig::InMemory { seed } => {
            tracing::info!(records = seed.len(), "using in-memory user store");
            Ok(Box::new(InMemoryUserStore::with_users(seed.iter().cloned())))
        }
        StoreBackendConfig::Sqlite {
            path,
            read_connections,
        } if path == ":memory:" => Ok(Box::new(SqliteUserStore::open_in_memory_with_readers(
            *read_connections,
        )?)),
        StoreBackendConfig::Sqlite {
            path,
            read_connections,
        } => Ok(Box::new(SqliteUserStore::open_with_readers(
            path,
            *read_connections,
        )?)),
    }
}

/// Construct the lock-guarded accessor, validating the whole configuration.
pub fn build_service(cfg: &ServiceConfig) -> Result<UserService<DynUserStore>, StoreError> {
    cfg.validate()
        .map_err(|e| StoreError::Backend(format!("config invalid: {e}")))?;

    let store = build_store(&cfg.store)?;
    Ok(UserService::with_policy(store, cfg.lock.wait_policy()))
}
