//! Remote replay of queued mutations.

mod http;

use thiserror::Error;

use crate::sync::PendingMutation;

pub use http::HttpRemote;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Invalid remote configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Remote request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Remote API error: {message} ({status})")]
    Api { status: u16, message: String },
    #[error("Remote rejected mutation: {0}")]
    Rejected(String),
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Performs the remote create/update/delete matching a queued mutation.
///
/// Any error counts as a failed replay: the entry stays queued and blocks
/// the entries behind it until a later drain succeeds.
#[allow(async_fn_in_trait)]
pub trait RemoteSync {
    async fn replay(&self, mutation: &PendingMutation) -> RemoteResult<()>;
}
