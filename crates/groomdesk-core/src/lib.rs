//! groomdesk-core - Core library for Groomdesk
//!
//! This crate contains the local key-value store, the typed entity models,
//! the per-kind repositories and the offline sync queue that replays local
//! writes against the remote API once connectivity is back.

pub mod config;
pub mod error;
pub mod ids;
pub mod models;
pub mod remote;
pub mod repository;
pub mod services;
pub mod store;
pub mod sync;
pub mod util;

pub use config::GroomdeskConfig;
pub use error::{Error, Result};
pub use models::{Appointment, Client, Employee, Entity, EntityId, EntityKind, Product, Service};
pub use remote::{HttpRemote, RemoteError, RemoteSync};
pub use repository::{Repository, StoreRepository};
pub use services::LocalDataService;
pub use sync::{
    ConnectivityEvent, DrainOutcome, MutationAction, PendingMutation, QueueStatus, SyncQueue,
    SyncStatus,
};
