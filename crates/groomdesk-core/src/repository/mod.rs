//! Per-kind record repositories.
//!
//! Every write is applied to the in-memory list first, mirrored to the store
//! and then handed to the sync queue. Nothing here waits for the network.

mod store_repository;

use serde_json::Value;

use crate::error::Result;
use crate::models::{Entity, EntityId};

pub use store_repository::StoreRepository;

/// Local CRUD over one entity kind
pub trait Repository<T: Entity> {
    /// Every cached record, in insertion order
    fn get_all(&self) -> Vec<T>;

    /// Get a record by ID
    fn get(&self, id: &EntityId) -> Option<T>;

    /// Store a new record and queue its creation.
    ///
    /// Assigns an id when the record has none. Rejects records that fail
    /// validation or reuse an id already present.
    fn add(&self, record: T) -> Result<T>;

    /// Merge `patch` into the record with `id` and queue the update.
    ///
    /// Returns `Ok(None)` when no such record exists.
    fn update(&self, id: &EntityId, patch: &Value) -> Result<Option<T>>;

    /// Remove the record with `id` and queue its deletion.
    ///
    /// Returns whether a record was removed.
    fn delete(&self, id: &EntityId) -> bool;

    /// Replace the cached records with server-provided ones without queueing
    /// anything.
    fn hydrate(&self, records: Vec<T>) -> Result<()>;
}
