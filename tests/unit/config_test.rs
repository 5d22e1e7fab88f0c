//! Tests for configuration validation

use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

use user_rwlock_service::config::{HttpConfig, LockConfig, ServiceConfig, StoreBackendConfig};
use user_rwlock_service::core::User;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_default_config_is_valid() {
    let config = ServiceConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.http.bind_addr(), "127.0.0.1:8080");
    assert_eq!(config.store, StoreBackendConfig::InMemory { seed: vec![] });
}

#[test]
fn test_lock_config_invalid_poll_interval() {
    let invalid = LockConfig {
        acquire_timeout_ms: None,
        poll_interval_ms: 0,
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_lock_config_invalid_timeout() {
    let invalid = LockConfig {
        acquire_timeout_ms: Some(0),
        poll_interval_ms: 10,
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_lock_config_wait_policy() {
    let policy = LockConfig {
        acquire_timeout_ms: Some(500),
        poll_interval_ms: 5,
    }
    .wait_policy();
    assert_eq!(policy.timeout, Some(Duration::from_millis(500)));
    assert_eq!(policy.poll_interval, Duration::from_millis(5));
}

#[test]
fn test_store_config_duplicate_seed() {
    let invalid = StoreBackendConfig::InMemory {
        seed: vec![User::new(1, "a", "a@x.com", 0), User::new(1, "b", "b@x.com", 0)],
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_store_config_empty_sqlite_path() {
    let invalid = StoreBackendConfig::sqlite("  ");
    assert!(invalid.validate().is_err());
}

#[test]
fn test_store_config_zero_read_connections() {
    let invalid = StoreBackendConfig::Sqlite {
        path: "users.db".into(),
        read_connections: 0,
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_http_config_invalid() {
    let invalid = HttpConfig {
        host: String::new(),
        port: 8080,
        worker_threads: None,
    };
    assert!(invalid.validate().is_err());

    let invalid = HttpConfig {
        worker_threads: Some(0),
        ..HttpConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_effective_worker_threads() {
    let config = HttpConfig {
        worker_threads: Some(3),
        ..HttpConfig::default()
    };
    assert_eq!(config.effective_worker_threads(), 3);
    assert!(HttpConfig::default().effective_worker_threads() >= 1);
}

#[test]
fn test_service_config_from_json() {
    let json = r#"{
        "lock": { "acquire_timeout_ms": 1000 },
        "store": {
            "backend": "in_memory",
            "seed": [{ "id": 1, "username": "a", "email": "a@x.com", "state": 1 }]
        },
        "http": { "host": "0.0.0.0", "port": 9000 }
    }"#;

    let config = ServiceConfig::from_json_str(json).unwrap();
    assert_eq!(config.lock.acquire_timeout_ms, Some(1000));
    assert_eq!(config.lock.poll_interval_ms, 10);
    assert_eq!(config.http.bind_addr(), "0.0.0.0:9000");
    match config.store {
        StoreBackendConfig::InMemory { seed } => assert_eq!(seed.len(), 1),
        other => panic!("unexpected backend {other:?}"),
    }
}

#[test]
fn test_service_config_from_json_sqlite() {
    let json = r#"{ "store": { "backend": "sqlite", "path": "users.db" } }"#;
    let config = ServiceConfig::from_json_str(json).unwrap();
    assert_eq!(
        config.store,
        StoreBackendConfig::Sqlite {
            path: "users.db".into(),
            read_connections: 4,
        }
    );

    let json = r#"{ "store": { "backend": "sqlite", "path": "users.db", "read_connections": 8 } }"#;
    let config = ServiceConfig::from_json_str(json).unwrap();
    assert_eq!(
        config.store,
        StoreBackendConfig::Sqlite {
            path: "users.db".into(),
            read_connections: 8,
        }
    );
}

#[test]
fn test_service_config_from_json_rejects_invalid() {
    let json = r#"{ "lock": { "poll_interval_ms": 0 } }"#;
    assert!(ServiceConfig::from_json_str(json).is_err());
    assert!(ServiceConfig::from_json_str("not json").is_err());
}

#[test]
fn test_from_lookup_overrides() {
    let config = ServiceConfig::from_lookup(lookup(&[
        ("USER_SERVICE_HOST", "0.0.0.0"),
        ("USER_SERVICE_PORT", "3000"),
        ("USER_SERVICE_DB", ":memory:"),
        ("USER_SERVICE_LOCK_TIMEOUT_MS", "250"),
    ]))
    .unwrap();

    assert_eq!(config.http.bind_addr(), "0.0.0.0:3000");
    assert_eq!(
        config.store,
        StoreBackendConfig::sqlite(":memory:")
    );
    assert_eq!(config.lock.acquire_timeout_ms, Some(250));
}

#[test]
fn test_from_lookup_bad_port() {
    assert!(ServiceConfig::from_lookup(lookup(&[("USER_SERVICE_PORT", "http")])).is_err());
}

#[test]
fn test_from_lookup_reads_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "http": {{ "port": 4000 }}, "lock": {{ "acquire_timeout_ms": 50 }} }}"#
    )
    .unwrap();
    let path = file.path().to_string_lossy().to_string();

    let config = ServiceConfig::from_lookup(lookup(&[
        ("USER_SERVICE_CONFIG", path.as_str()),
        ("USER_SERVICE_PORT", "4001"),
    ]))
    .unwrap();

    assert_eq!(config.http.port, 4001);
    assert_eq!(config.lock.acquire_timeout_ms, Some(50));
}

#[test]
fn test_from_lookup_missing_config_file() {
    let result = ServiceConfig::from_lookup(lookup(&[(
        "USER_SERVICE_CONFIG",
        "/nonexistent/user-service.json",
    )]));
    assert!(result.is_err());
}
