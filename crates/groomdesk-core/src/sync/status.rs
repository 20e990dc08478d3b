//! Sync status read model and manual sync trigger.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::queue::{DrainOutcome, SyncQueue};
use crate::remote::RemoteSync;
use crate::util::format_relative_time;

/// Point-in-time view of the offline queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub is_online: bool,
    pub is_syncing: bool,
    pub pending_count: usize,
    pub total: usize,
    pub last_sync_time: Option<DateTime<Utc>>,
}

impl SyncStatus {
    /// Snapshot of `queue` as it is right now
    pub fn capture(queue: &SyncQueue) -> Self {
        let counts = queue.status();
        Self {
            is_online: queue.connectivity().is_online(),
            is_syncing: queue.is_draining(),
            pending_count: counts.pending,
            total: counts.total,
            last_sync_time: queue.last_sync_at(),
        }
    }

    /// Recency of the last successful sync, `never` if there was none.
    pub fn last_sync_label(&self, now: DateTime<Utc>) -> String {
        self.last_sync_time.map_or_else(
            || "never".to_string(),
            |timestamp| format_relative_time(timestamp, now),
        )
    }
}

/// Reports queue state and lets the user force a sync
pub struct SyncStatusReporter<R> {
    queue: Arc<SyncQueue>,
    remote: Arc<R>,
}

impl<R> Clone for SyncStatusReporter<R> {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
            remote: Arc::clone(&self.remote),
        }
    }
}

impl<R: RemoteSync> SyncStatusReporter<R> {
    pub const fn new(queue: Arc<SyncQueue>, remote: Arc<R>) -> Self {
        Self { queue, remote }
    }

    pub fn status(&self) -> SyncStatus {
        SyncStatus::capture(&self.queue)
    }

    /// Drain the queue now. Skipped while offline or mid-drain.
    pub async fn sync_now(&self) -> DrainOutcome {
        tracing::info!("Manual sync requested");
        self.queue.drain(self.remote.as_ref()).await
    }
}
