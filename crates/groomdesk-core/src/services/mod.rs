//! Service layer wiring the store, the sync queue and the repositories.

mod local_data;

pub use local_data::LocalDataService;
