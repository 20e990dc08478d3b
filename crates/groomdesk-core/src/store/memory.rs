//! In-process store used by tests and throwaway sessions

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

use super::KeyValueStore;

/// `BTreeMap`-backed implementation of [`KeyValueStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &Value) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.clone());
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn get_all(&self) -> BTreeMap<String, Value> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get("clients").is_none());

        store.set("clients", &json!([{"id": 1, "name": "Max"}]));
        assert_eq!(store.get("clients"), Some(json!([{"id": 1, "name": "Max"}])));

        store.remove("clients");
        assert!(store.get("clients").is_none());
    }

    #[test]
    fn test_clear_and_get_all() {
        let store = MemoryStore::new();
        store.set("a", &json!(1));
        store.set("b", &json!("two"));
        assert_eq!(store.get_all().len(), 2);

        store.clear();
        assert!(store.get_all().is_empty());
    }
}
