//! Store adapters.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryUserStore;
pub use sqlite::SqliteUserStore;
