//! Tests for builder modules

use user_rwlock_service::builders::{build_service, build_store};
use user_rwlock_service::config::{LockConfig, ServiceConfig, StoreBackendConfig};
use user_rwlock_service::core::{AccessError, User, UserStore};

#[test]
fn test_build_in_memory_service_with_seed() {
    let config = ServiceConfig {
        store: StoreBackendConfig::InMemory {
            seed: vec![User::new(1, "a", "a@x.com", 1)],
        },
        ..ServiceConfig::default()
    };

    let service = build_service(&config).unwrap();
    assert_eq!(service.read(1).unwrap().email, "a@x.com");
    assert!(matches!(service.read(2), Err(AccessError::NotFound(2))));
}

#[test]
fn test_build_service_carries_lock_policy() {
    let config = ServiceConfig {
        lock: LockConfig {
            acquire_timeout_ms: Some(75),
            poll_interval_ms: 5,
        },
        ..ServiceConfig::default()
    };

    let service = build_service(&config).unwrap();
    assert_eq!(service.policy(), &config.lock.wait_policy());
}

#[test]
fn test_build_sqlite_in_memory_store() {
    let store = build_store(&StoreBackendConfig::Sqlite {
        path: ":memory:".into(),
        read_connections: 2,
    })
    .unwrap();
    assert!(store.fetch_by_id(1).unwrap().is_none());
}

#[test]
fn test_build_sqlite_file_service() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.db");
    let config = ServiceConfig {
        store: StoreBackendConfig::sqlite(path.to_string_lossy()),
        ..ServiceConfig::default()
    };

    let service = build_service(&config).unwrap();
    assert!(matches!(service.read(1), Err(AccessError::NotFound(1))));
    assert!(path.exists());
}

#[test]
fn test_build_rejects_invalid_config() {
    let config = ServiceConfig {
        lock: LockConfig {
            acquire_timeout_ms: None,
            poll_interval_ms: 0,
        },
        ..ServiceConfig::default()
    };
    assert!(build_service(&config).is_err());
}
