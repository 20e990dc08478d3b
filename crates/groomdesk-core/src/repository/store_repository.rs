//! Store-backed repository implementation

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{json, Value};

use super::Repository;
use crate::error::{Error, Result};
use crate::ids::IdGenerator;
use crate::models::{merge_patch, Entity, EntityId};
use crate::store::KeyValueStore;
use crate::sync::{MutationAction, SyncQueue};

/// [`Repository`] keeping its records under the kind's collection key
pub struct StoreRepository<T: Entity> {
    store: Arc<dyn KeyValueStore>,
    queue: Arc<SyncQueue>,
    ids: Arc<dyn IdGenerator>,
    records: Mutex<Vec<T>>,
}

impl<T: Entity> StoreRepository<T> {
    /// Create a repository, reading any records already in the store.
    pub fn load(
        store: Arc<dyn KeyValueStore>,
        queue: Arc<SyncQueue>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let key = T::KIND.collection();
        let records = match store.get(key) {
            Some(raw) => serde_json::from_value::<Vec<T>>(raw).unwrap_or_else(|error| {
                tracing::warn!("Ignoring unreadable {} collection: {}", key, error);
                Vec::new()
            }),
            None => Vec::new(),
        };

        Self {
            store,
            queue,
            ids,
            records: Mutex::new(records),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, records: &[T]) {
        let key = T::KIND.collection();
        match serde_json::to_value(records) {
            Ok(value) => self.store.set(key, &value),
            Err(error) => tracing::warn!("Failed to serialize {} collection: {}", key, error),
        }
    }

    /// Drop the cached records. The store is expected to be cleared separately.
    pub fn clear_cache(&self) {
        self.lock().clear();
    }

    fn position(records: &[T], id: &EntityId) -> Option<usize> {
        records.iter().position(|record| record.id() == Some(id))
    }
}

impl<T: Entity> Repository<T> for StoreRepository<T> {
    fn get_all(&self) -> Vec<T> {
        self.lock().clone()
    }

    fn get(&self, id: &EntityId) -> Option<T> {
        let records = self.lock();
        Self::position(&records, id).map(|index| records[index].clone())
    }

    fn add(&self, mut record: T) -> Result<T> {
        record.validate()?;
        let id = match record.id() {
            Some(id) => id.clone(),
            None => {
                let id = self.ids.next_id();
                record.set_id(id.clone());
                id
            }
        };
        let data = serde_json::to_value(&record)?;

        {
            let mut records = self.lock();
            if Self::position(&records, &id).is_some() {
                return Err(Error::InvalidInput(format!(
                    "{} {id} already exists",
                    T::KIND
                )));
            }
            records.push(record.clone());
            self.persist(&records);
        }

        self.queue.enqueue(T::KIND, id, MutationAction::Create, data);
        Ok(record)
    }

    fn update(&self, id: &EntityId, patch: &Value) -> Result<Option<T>> {
        let updated = {
            let mut records = self.lock();
            let Some(index) = Self::position(&records, id) else {
                tracing::debug!("Ignoring update for missing {} {}", T::KIND, id);
                return Ok(None);
            };
            let updated = merge_patch(&records[index], patch)?;
            records[index] = updated.clone();
            self.persist(&records);
            updated
        };

        let data = serde_json::to_value(&updated)?;
        self.queue.enqueue(T::KIND, id.clone(), MutationAction::Update, data);
        Ok(Some(updated))
    }

    fn delete(&self, id: &EntityId) -> bool {
        {
            let mut records = self.lock();
            let Some(index) = Self::position(&records, id) else {
                tracing::debug!("Ignoring delete for missing {} {}", T::KIND, id);
                return false;
            };
            records.remove(index);
            self.persist(&records);
        }

        self.queue.enqueue(T::KIND, id.clone(), MutationAction::Delete, json!({ "id": id }));
        true
    }

    fn hydrate(&self, records: Vec<T>) -> Result<()> {
        for record in &records {
            record.validate()?;
        }
        let mut cached = self.lock();
        *cached = records;
        self.persist(&cached);
        tracing::debug!("Hydrated {} {} record(s)", cached.len(), T::KIND);
        Ok(())
    }
}
