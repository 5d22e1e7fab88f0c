//! In-memory store backend.

use std::collections::HashMap;

use crate::core::{StoreError, User, UserId, UserStore};

/// Simple in-memory store for development/testing.
///
/// Holds no lock of its own: the accessor's reader-writer lock is the only
/// synchronization, so `update_by_id` relies on the exclusive guard.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserStore {
    users: HashMap<UserId, User>,
}

impl InMemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `users`. Later duplicates of an id win.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
        }
    }

    /// Provision a record outside the accessor.
    pub fn insert(&mut self, user: User) -> Option<User> {
        self.users.insert(user.id, user)
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserStore for InMemoryUserStore {
    fn fetch_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(&id).cloned())
    }

    fn update_by_id(&mut self, user: &User) -> Result<usize, StoreError> {
        match self.users.get_mut(&user.id) {
            Some(slot) => {
                slot.clone_from(user);
                tracing::debug!(id = user.id, "updated in-memory user");
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
