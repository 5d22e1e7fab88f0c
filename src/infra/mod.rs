//! Infrastructure adapters for record storage backends.

pub mod store;

pub use store::{InMemoryUserStore, SqliteUserStore};
