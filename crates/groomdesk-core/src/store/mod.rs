//! Durable key-value store backing the repositories and the sync queue.
//!
//! The store never surfaces failures to its callers: reads that fail come
//! back as `None`, writes that fail are logged and dropped. Callers must not
//! depend on persistence succeeding.

mod memory;
mod migrations;
mod sqlite;

use std::collections::BTreeMap;

use serde_json::Value;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Storage key of the serialized sync queue
pub const SYNC_QUEUE_KEY: &str = "sync_queue";

/// Key/value medium holding JSON values
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `None` when absent or unreadable
    fn get(&self, key: &str) -> Option<Value>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &Value);

    /// Delete a value if present
    fn remove(&self, key: &str);

    /// Delete every value
    fn clear(&self);

    /// Every readable key/value pair
    fn get_all(&self) -> BTreeMap<String, Value>;
}
