//! Lock-guarded record accessor.
//!
//! [`UserService`] owns its store inside one reader-writer lock. Reads share
//! the lock, writes hold it exclusively, and the guard is dropped before any
//! result or error reaches the caller. The store call runs inside the critical
//! section, so a write's exclusive window lasts as long as the store takes.

use crate::rwlock::{acquire_read, acquire_write, RwLock, WaitPolicy};

use super::error::AccessError;
use super::interrupt::Interrupt;
use super::record::{User, UserId};
use super::store::UserStore;

/// Reader-writer guarded accessor over a [`UserStore`].
///
/// One lock guards every record behind the accessor. Construct one accessor per
/// logical resource scope and share it with `Arc`.
///
/// ```
/// use user_rwlock_service::core::{User, UserService};
/// use user_rwlock_service::infra::store::InMemoryUserStore;
///
/// let store = InMemoryUserStore::with_users([User::new(1, "old", "old@x.com", 0)]);
/// let service = UserService::new(store);
///
/// let id = service.write(&User::new(1, "a", "a@x.com", 1)).unwrap();
/// assert_eq!(id, 1);
/// assert_eq!(service.read(1).unwrap(), User::new(1, "a", "a@x.com", 1));
/// ```
pub struct UserService<S> {
    policy: WaitPolicy,
    store: RwLock<S>,
}

impl<S: UserStore> UserService<S> {
    /// Wrap `store`, waiting indefinitely for the lock.
    pub fn new(store: S) -> Self {
        Self::with_policy(store, WaitPolicy::default())
    }

    /// Wrap `store` with an explicit wait policy.
    pub fn with_policy(store: S, policy: WaitPolicy) -> Self {
        Self {
            policy,
            store: RwLock::new(store),
        }
    }

    /// Wait policy applied to every acquisition.
    pub const fn policy(&self) -> &WaitPolicy {
        &self.policy
    }

    /// Fetch a record under the shared lock.
    pub fn read(&self, id: UserId) -> Result<User, AccessError> {
        self.read_inner(id, None)
    }

    /// Like [`read`](Self::read), but gives up with
    /// [`AccessError::Interrupted`] if `interrupt` is raised while waiting for
    /// the lock. Once the fetch has been issued the outcome is reported as-is.
    pub fn read_interruptible(
        &self,
        id: UserId,
        interrupt: &Interrupt,
    ) -> Result<User, AccessError> {
        self.read_inner(id, Some(interrupt))
    }

    /// Update a record under the exclusive lock and return its identifier.
    ///
    /// Fails with [`AccessError::NotFound`] when the store has no row for
    /// `user.id`; the accessor never creates records.
    pub fn write(&self, user: &User) -> Result<UserId, AccessError> {
        self.write_inner(user, None)
    }

    /// Like [`write`](Self::write), but gives up with
    /// [`AccessError::Interrupted`] if `interrupt` is raised while waiting for
    /// the lock. Once the update has been issued the outcome is reported as-is.
    pub fn write_interruptible(
        &self,
        user: &User,
        interrupt: &Interrupt,
    ) -> Result<UserId, AccessError> {
        self.write_inner(user, Some(interrupt))
    }

    /// Consume the accessor and hand back the store.
    pub fn into_store(self) -> S {
        self.store.into_inner()
    }

    fn read_inner(&self, id: UserId, interrupt: Option<&Interrupt>) -> Result<User, AccessError> {
        let fetched = {
            let guard = acquire_read(&self.store, &self.policy, interrupt)?;
            guard.fetch_by_id(id)
        };
        fetched?.ok_or(AccessError::NotFound(id))
    }

    fn write_inner(
        &self,
        user: &User,
        interrupt: Option<&Interrupt>,
    ) -> Result<UserId, AccessError> {
        let updated = {
            let mut guard = acquire_write(&self.store, &self.policy, interrupt)?;
            guard.update_by_id(user)
        }?;

        if updated == 0 {
            return Err(AccessError::NotFound(user.id));
        }
        Ok(user.id)
    }
}
