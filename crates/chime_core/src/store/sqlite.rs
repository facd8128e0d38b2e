//! SQLite-backed key-value store.

use super::{KeyValueStore, StoreError, StoreResult};
use crate::db::{open_db, open_db_in_memory, DbError};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Key-value store over the `kv_entries` table of one SQLite database.
pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Opens (or creates) a file-backed store with migrations applied.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens an in-memory store, used by tests and the CLI smoke path.
    pub fn in_memory() -> Result<Self, DbError> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|err| StoreError::ReadFailed(err.to_string()))
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.conn
            .execute(
                "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(|err| StoreError::WriteFailed(err.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteKeyValueStore;
    use crate::store::KeyValueStore;

    #[test]
    fn get_absent_key_is_none() {
        let store = SqliteKeyValueStore::in_memory().unwrap();
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn set_then_get_and_overwrite() {
        let mut store = SqliteKeyValueStore::in_memory().unwrap();
        store.set("days", "[1,3]").unwrap();
        assert_eq!(store.get("days").unwrap().as_deref(), Some("[1,3]"));

        store.set("days", "[5]").unwrap();
        assert_eq!(store.get("days").unwrap().as_deref(), Some("[5]"));
    }
}
