//! Tests for store adapters driven through the accessor

use user_rwlock_service::core::{AccessError, User, UserService, UserStore};
use user_rwlock_service::infra::store::{InMemoryUserStore, SqliteUserStore};

fn exercise<S: UserStore>(service: &UserService<S>) {
    let updated = User::new(1, "a", "a@x.com", 1);
    assert_eq!(service.write(&updated).unwrap(), 1);
    assert_eq!(service.read(1).unwrap(), updated);

    assert!(matches!(service.read(404), Err(AccessError::NotFound(404))));
    assert!(matches!(
        service.write(&User::new(404, "x", "x@x.com", 0)),
        Err(AccessError::NotFound(404))
    ));
}

#[test]
fn test_in_memory_store_through_service() {
    let store = InMemoryUserStore::with_users([User::new(1, "seed", "seed@x.com", 0)]);
    exercise(&UserService::new(store));
}

#[test]
fn test_sqlite_store_through_service() {
    let store = SqliteUserStore::open_in_memory().unwrap();
    store.insert(&User::new(1, "seed", "seed@x.com", 0)).unwrap();
    exercise(&UserService::new(store));
}

#[test]
fn test_sqlite_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.db");

    {
        let store = SqliteUserStore::open(&path).unwrap();
        store.insert(&User::new(1, "seed", "seed@x.com", 0)).unwrap();
        let service = UserService::new(store);
        service.write(&User::new(1, "kept", "kept@x.com", 2)).unwrap();
    }

    let service = UserService::new(SqliteUserStore::open(&path).unwrap());
    assert_eq!(service.read(1).unwrap(), User::new(1, "kept", "kept@x.com", 2));
}

#[test]
fn test_in_memory_insert_replaces() {
    let mut store = InMemoryUserStore::new();
    assert!(store.insert(User::new(1, "a", "a@x.com", 0)).is_none());
    assert!(store.insert(User::new(1, "b", "b@x.com", 0)).is_some());
    assert_eq!(store.len(), 1);
}
