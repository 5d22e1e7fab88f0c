//! The user record guarded by the accessor.

use serde::{Deserialize, Serialize};

/// Unique, immutable record key.
pub type UserId = i64;

/// Small integer status flag carried by each record.
pub type UserState = i32;

/// A single user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Lookup key.
    pub id: UserId,
    /// Display name.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Status flag.
    pub state: UserState,
}

impl User {
    /// Build a record from its fields.
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        email: impl Into<String>,
        state: UserState,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            state,
        }
    }

    /// Replace the identifier, as done when the key comes from a request path.
    #[must_use]
    pub const fn with_id(mut self, id: UserId) -> Self {
        self.id = id;
        self
    }
}
