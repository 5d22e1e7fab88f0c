//! SQLite-backed store adapter.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::core::{StoreError, User, UserId, UserStore};

/// Reader connections opened when no count is given.
pub const DEFAULT_READ_CONNECTIONS: usize = 4;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite adapter over the `users` table.
///
/// `rusqlite::Connection` is `Send` but not `Sync`, so each connection sits
/// behind its own mutex. Fetches run under the accessor's shared guard and
/// check out one of several reader connections, so concurrent reads execute
/// their queries in parallel. Updates run under the exclusive guard and reach
/// the dedicated writer connection through `get_mut`.
pub struct SqliteUserStore {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    next_reader: AtomicUsize,
}

impl SqliteUserStore {
    /// Migration statements for the user table.
    pub fn migrations() -> &'static [&'static str] {
        &[r"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    username TEXT NOT NULL,
    email TEXT NOT NULL,
    state INTEGER NOT NULL DEFAULT 0
);
"]
    }

    /// Open (or create) a database file with [`DEFAULT_READ_CONNECTIONS`]
    /// reader connections and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with_readers(path, DEFAULT_READ_CONNECTIONS)
    }

    /// Open (or create) a database file with `readers` reader connections
    /// (at least one) and apply migrations.
    pub fn open_with_readers(path: impl AsRef<Path>, readers: usize) -> Result<Self, StoreError> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), readers, "opening sqlite user store");
        Self::open_pool(|| Connection::open(path), readers)
    }

    /// Open a private in-memory database with [`DEFAULT_READ_CONNECTIONS`]
    /// reader connections and apply migrations.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::open_in_memory_with_readers(DEFAULT_READ_CONNECTIONS)
    }

    /// Open a private in-memory database with `readers` reader connections.
    ///
    /// All connections attach to one shared-cache database named uniquely for
    /// this store; it lives as long as the store.
    pub fn open_in_memory_with_readers(readers: usize) -> Result<Self, StoreError> {
        let uri = format!("file:user-store-{}?mode=memory&cache=shared", Uuid::new_v4());
        tracing::debug!(%uri, readers, "opening in-memory sqlite user store");
        Self::open_pool(|| Connection::open(&uri), readers)
    }

    fn open_pool(
        open: impl Fn() -> rusqlite::Result<Connection>,
        readers: usize,
    ) -> Result<Self, StoreError> {
        let writer = open()?;
        writer.busy_timeout(BUSY_TIMEOUT)?;
        for migration in Self::migrations() {
            writer.execute_batch(migration)?;
        }

        let readers = (0..readers.max(1))
            .map(|_| {
                let conn = open()?;
                conn.busy_timeout(BUSY_TIMEOUT)?;
                Ok(Mutex::new(conn))
            })
            .collect::<Result<Vec<_>, rusqlite::Error>>()?;

        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            next_reader: AtomicUsize::new(0),
        })
    }

    /// Number of reader connections.
    pub fn reader_count(&self) -> usize {
        self.readers.len()
    }

    /// Provision a record outside the accessor.
    pub fn insert(&self, user: &User) -> Result<(), StoreError> {
        self.writer.lock().execute(
            "INSERT INTO users (id, username, email, state) VALUES (?1, ?2, ?3, ?4)",
            params![user.id, user.username, user.email, user.state],
        )?;
        Ok(())
    }

    /// Check out an idle reader connection, or queue on one in rotation when
    /// all are busy.
    fn reader(&self) -> MutexGuard<'_, Connection> {
        if let Some(conn) = self.readers.iter().find_map(|conn| conn.try_lock()) {
            return conn;
        }
        let idx = self.next_reader.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        self.readers[idx].lock()
    }
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        state: row.get(3)?,
    })
}

impl UserStore for SqliteUserStore {
    fn fetch_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let conn = self.reader();
        let mut stmt = conn.prepare("SELECT id, username, email, state FROM users WHERE id = ?1")?;
        let result = stmt.query_row(params![id], row_to_user);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => {
                tracing::warn!(id, error = %e, "sqlite fetch failed");
                Err(e.into())
            }
        }
    }

    fn update_by_id(&mut self, user: &User) -> Result<usize, StoreError> {
        let rows = self
            .writer
            .get_mut()
            .execute(
                "UPDATE users SET username = ?1, email = ?2, state = ?3 WHERE id = ?4",
                params![user.username, user.email, user.state, user.id],
            )
            .map_err(|e| {
                tracing::warn!(id = user.id, error = %e, "sqlite update failed");
                StoreError::from(e)
            })?;
        tracing::debug!(id = user.id, rows, "updated sqlite user");
        Ok(rows)
    }
}
