//! Store adapter seam consumed by the accessor.

use super::error::StoreError;
use super::record::{User, UserId};

/// Blocking record store.
///
/// The accessor owns its store inside the reader-writer lock: `fetch_by_id`
/// runs under a shared guard and `update_by_id` under the exclusive guard,
/// which is why it takes `&mut self`.
pub trait UserStore: Send + Sync {
    /// Look up a record by exact key. `Ok(None)` means no such record.
    fn fetch_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Overwrite the record keyed by `user.id`, returning the number of rows
    /// updated (zero when the key is unknown).
    fn update_by_id(&mut self, user: &User) -> Result<usize, StoreError>;
}

/// Type-erased store chosen at startup.
pub type DynUserStore = Box<dyn UserStore>;

impl<S: UserStore + ?Sized> UserStore for Box<S> {
    fn fetch_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        (**self).fetch_by_id(id)
    }

    fn update_by_id(&mut self, user: &User) -> Result<usize, StoreError> {
        (**self).update_by_id(user)
    }
}
