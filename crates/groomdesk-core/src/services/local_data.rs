//! Shared local-data service used by front ends.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::ids::{IdGenerator, UuidV7Generator};
use crate::models::{Appointment, Client, Employee, Entity, EntityId, EntityKind, Product, Service};
use crate::remote::RemoteSync;
use crate::repository::{Repository, StoreRepository};
use crate::store::{KeyValueStore, MemoryStore, SqliteStore};
use crate::sync::{
    Connectivity, ConnectivityEvent, ConnectivityMonitor, DrainOutcome, PendingMutation,
    SyncQueue, SyncStatus, SyncStatusReporter,
};

/// Runs `$body` with `$repo` bound to the repository for `$kind`.
macro_rules! with_repository {
    ($service:expr, $kind:expr, $repo:ident => $body:expr) => {
        match $kind {
            EntityKind::Client => {
                let $repo = &$service.clients;
                $body
            }
            EntityKind::Appointment => {
                let $repo = &$service.appointments;
                $body
            }
            EntityKind::Service => {
                let $repo = &$service.services;
                $body
            }
            EntityKind::Product => {
                let $repo = &$service.products;
                $body
            }
            EntityKind::Employee => {
                let $repo = &$service.employees;
                $body
            }
        }
    };
}

/// Thread-safe handle over the whole offline data layer.
#[derive(Clone)]
pub struct LocalDataService {
    store: Arc<dyn KeyValueStore>,
    store_path: Option<PathBuf>,
    queue: Arc<SyncQueue>,
    clients: Arc<StoreRepository<Client>>,
    appointments: Arc<StoreRepository<Appointment>>,
    services: Arc<StoreRepository<Service>>,
    products: Arc<StoreRepository<Product>>,
    employees: Arc<StoreRepository<Employee>>,
}

impl LocalDataService {
    /// Open a service backed by a SQLite store at `store_path`.
    pub fn open_path(store_path: impl Into<PathBuf>, online: bool) -> Result<Self> {
        let store_path = store_path.into();
        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open(&store_path)?);

        let mut service =
            Self::with_store(store, Connectivity::new(online), Arc::new(UuidV7Generator));
        service.store_path = Some(store_path);
        Ok(service)
    }

    /// Open a service holding everything in memory (primarily for tests).
    pub fn open_in_memory(online: bool) -> Self {
        Self::with_store(
            Arc::new(MemoryStore::new()),
            Connectivity::new(online),
            Arc::new(UuidV7Generator),
        )
    }

    /// Wire the queue and the five repositories over an existing store.
    pub fn with_store(
        store: Arc<dyn KeyValueStore>,
        connectivity: Connectivity,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let queue = Arc::new(SyncQueue::load(Arc::clone(&store), connectivity));
        let repository = || (Arc::clone(&store), Arc::clone(&queue), Arc::clone(&ids));

        Self {
            clients: Arc::new(load_repository(repository())),
            appointments: Arc::new(load_repository(repository())),
            services: Arc::new(load_repository(repository())),
            products: Arc::new(load_repository(repository())),
            employees: Arc::new(load_repository(repository())),
            store_path: None,
            queue,
            store,
        }
    }

    pub fn store_path(&self) -> Option<&Path> {
        self.store_path.as_deref()
    }

    pub fn clients(&self) -> &StoreRepository<Client> {
        &self.clients
    }

    pub fn appointments(&self) -> &StoreRepository<Appointment> {
        &self.appointments
    }

    pub fn services(&self) -> &StoreRepository<Service> {
        &self.services
    }

    pub fn products(&self) -> &StoreRepository<Product> {
        &self.products
    }

    pub fn employees(&self) -> &StoreRepository<Employee> {
        &self.employees
    }

    pub fn queue(&self) -> &Arc<SyncQueue> {
        &self.queue
    }

    pub fn connectivity(&self) -> &Connectivity {
        self.queue.connectivity()
    }

    /// Add a record of `kind` from its JSON form, returning the stored record.
    pub fn add_json(&self, kind: EntityKind, record: Value) -> Result<Value> {
        with_repository!(self, kind, repo => add_value(repo, record))
    }

    /// Every cached record of `kind` in JSON form
    pub fn list_json(&self, kind: EntityKind) -> Result<Vec<Value>> {
        with_repository!(self, kind, repo => to_values(&repo.get_all()))
    }

    /// Patch a record of `kind`; `Ok(None)` when the id is unknown.
    pub fn update_json(
        &self,
        kind: EntityKind,
        id: &EntityId,
        patch: &Value,
    ) -> Result<Option<Value>> {
        with_repository!(self, kind, repo => {
            repo.update(id, patch)?
                .map(|record| serde_json::to_value(record).map_err(Error::from))
                .transpose()
        })
    }

    pub fn delete(&self, kind: EntityKind, id: &EntityId) -> bool {
        with_repository!(self, kind, repo => repo.delete(id))
    }

    pub fn pending_mutations(&self) -> Vec<PendingMutation> {
        self.queue.entries()
    }

    pub fn reporter<R: RemoteSync>(&self, remote: Arc<R>) -> SyncStatusReporter<R> {
        SyncStatusReporter::new(Arc::clone(&self.queue), remote)
    }

    pub fn monitor<R: RemoteSync>(
        &self,
        remote: Arc<R>,
    ) -> (ConnectivityMonitor<R>, mpsc::Sender<ConnectivityEvent>) {
        ConnectivityMonitor::new(Arc::clone(&self.queue), remote)
    }

    pub fn status(&self) -> SyncStatus {
        SyncStatus::capture(&self.queue)
    }

    pub async fn sync_now<R: RemoteSync>(&self, remote: &R) -> DrainOutcome {
        self.queue.drain(remote).await
    }

    /// Wipe the local store, the sync queue and every cached record.
    ///
    /// Unsynced writes are lost.
    pub fn clear_local_data(&self) {
        let dropped = self.queue.status().pending;
        self.queue.clear();
        self.store.clear();
        for kind in EntityKind::ALL {
            with_repository!(self, kind, repo => repo.clear_cache());
        }
        if dropped > 0 {
            tracing::warn!("Cleared local data with {} unsynced mutation(s)", dropped);
        } else {
            tracing::info!("Cleared local data");
        }
    }
}

fn load_repository<T: Entity>(
    (store, queue, ids): (Arc<dyn KeyValueStore>, Arc<SyncQueue>, Arc<dyn IdGenerator>),
) -> StoreRepository<T> {
    StoreRepository::load(store, queue, ids)
}

fn add_value<T: Entity>(repo: &StoreRepository<T>, record: Value) -> Result<Value> {
    let record: T = serde_json::from_value(record)
        .map_err(|error| Error::InvalidInput(format!("invalid {} record: {error}", T::KIND)))?;
    Ok(serde_json::to_value(repo.add(record)?)?)
}

fn to_values<T: Entity>(records: &[T]) -> Result<Vec<Value>> {
    records
        .iter()
        .map(|record| serde_json::to_value(record).map_err(Error::from))
        .collect()
}
