use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] groomdesk_core::Error),
    #[error(transparent)]
    Remote(#[from] groomdesk_core::remote::RemoteError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid JSON argument: {0}")]
    InvalidJson(String),
    #[error("Record ID cannot be empty")]
    EmptyRecordId,
    #[error("No {kind} found with id {id}")]
    RecordNotFound { kind: String, id: String },
    #[error(
        "Sync is not configured. Set api_base_url in the config file or GROOMDESK_API_URL in the environment."
    )]
    SyncNotConfigured,
    #[error("{0} unsynced change(s) would be lost. Re-run with --force to discard them.")]
    UnsyncedChanges(usize),
    #[error("Sync stopped: {0}")]
    SyncStalled(String),
}
