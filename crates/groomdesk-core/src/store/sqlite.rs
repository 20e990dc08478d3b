//! SQLite-backed key/value store

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use super::{migrations, KeyValueStore};
use crate::error::Result;

/// Store wrapper around a single `SQLite` connection
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a store at the given path, creating it if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        migrations::run(&conn)?;
        tracing::debug!("Opened local store at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn try_get(&self, key: &str) -> Result<Option<Value>> {
        let raw: Option<String> = self
            .connection()
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;

        raw.map(|raw| serde_json::from_str(&raw).map_err(Into::into))
            .transpose()
    }

    fn try_set(&self, key: &str, value: &Value) -> Result<()> {
        let serialized = serde_json::to_string(value)?;
        let now = chrono::Utc::now().timestamp_millis();
        self.connection().execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, serialized, now],
        )?;
        Ok(())
    }

    fn try_remove(&self, key: &str) -> Result<()> {
        self.connection()
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn try_clear(&self) -> Result<()> {
        self.connection().execute("DELETE FROM kv", [])?;
        Ok(())
    }

    fn try_get_all(&self) -> Result<BTreeMap<String, Value>> {
        let conn = self.connection();
        let mut stmt = conn.prepare("SELECT key, value FROM kv ORDER BY key")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut entries = BTreeMap::new();
        for (key, raw) in rows {
            match serde_json::from_str(&raw) {
                Ok(value) => {
                    entries.insert(key, value);
                }
                Err(error) => {
                    tracing::warn!("Skipping unreadable store entry '{}': {}", key, error);
                }
            }
        }
        Ok(entries)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.try_get(key).unwrap_or_else(|error| {
            tracing::warn!("Failed to read store key '{}': {}", key, error);
            None
        })
    }

    fn set(&self, key: &str, value: &Value) {
        if let Err(error) = self.try_set(key, value) {
            tracing::warn!("Failed to write store key '{}': {}", key, error);
        }
    }

    fn remove(&self, key: &str) {
        if let Err(error) = self.try_remove(key) {
            tracing::warn!("Failed to remove store key '{}': {}", key, error);
        }
    }

    fn clear(&self) {
        if let Err(error) = self.try_clear() {
            tracing::warn!("Failed to clear local store: {}", error);
        }
    }

    fn get_all(&self) -> BTreeMap<String, Value> {
        self.try_get_all().unwrap_or_else(|error| {
            tracing::warn!("Failed to enumerate local store: {}", error);
            BTreeMap::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_set_and_get() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("products", &json!([{"id": 1, "name": "Brush", "stock": 3}]));

        assert_eq!(
            store.get("products"),
            Some(json!([{"id": 1, "name": "Brush", "stock": 3}]))
        );
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_set_overwrites() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("key", &json!(1));
        store.set("key", &json!(2));
        assert_eq!(store.get("key"), Some(json!(2)));
    }

    #[test]
    fn test_remove_clear_and_get_all() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("a", &json!({"x": 1}));
        store.set("b", &json!(true));
        store.set("c", &json!(null));

        store.remove("b");
        let all = store.get_all();
        assert_eq!(all.keys().cloned().collect::<Vec<_>>(), vec!["a", "c"]);

        store.clear();
        assert!(store.get_all().is_empty());
    }

    #[test]
    fn test_unreadable_value_reads_as_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .connection()
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES ('broken', '{not json', 0)",
                [],
            )
            .unwrap();
        store.set("fine", &json!("ok"));

        assert!(store.get("broken").is_none());
        let all = store.get_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all.get("fine"), Some(&json!("ok")));
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("groomdesk.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("clients", &json!([{"id": "a", "name": "Max"}]));
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("clients"),
            Some(json!([{"id": "a", "name": "Max"}]))
        );
    }
}
