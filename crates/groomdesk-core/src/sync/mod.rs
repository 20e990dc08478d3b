//! Offline write reconciliation.
//!
//! Repositories apply writes locally and hand a [`PendingMutation`] to the
//! [`SyncQueue`]. The queue persists itself after every change and, while
//! online, replays entries one at a time against a
//! [`RemoteSync`](crate::remote::RemoteSync) implementation. A failed replay
//! stops the pass so later writes never overtake an earlier one.
//!
//! ```text
//! Repository ──enqueue──► SyncQueue ──drain──► RemoteSync
//!                             ▲
//!        ConnectivityMonitor ─┘ (drain on reconnect)
//!        SyncStatusReporter  ─── reads status, "sync now"
//! ```

mod connectivity;
mod mutation;
mod queue;
mod status;

pub use connectivity::{Connectivity, ConnectivityEvent, ConnectivityMonitor};
pub use mutation::{MutationAction, PendingMutation};
pub use queue::{DrainOutcome, QueueStatus, SkipReason, SyncQueue};
pub use status::{SyncStatus, SyncStatusReporter};

#[cfg(test)]
pub(crate) mod test_helpers;
