//! Persisted queue of pending mutations.
//!
//! The queue maps each entity to its latest unconfirmed intent rather than
//! logging every write: a second create/update for an entity replaces the
//! first (remove + append). Deletes are never replaced; a write that follows
//! a queued delete lines up behind it. A delete of a record whose create was
//! never sent removes both, since the remote side has nothing to delete.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::connectivity::Connectivity;
use super::mutation::{MutationAction, PendingMutation};
use crate::models::{EntityId, EntityKind};
use crate::remote::RemoteSync;
use crate::store::{KeyValueStore, SYNC_QUEUE_KEY};

/// Aggregate queue counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueueStatus {
    /// Entries still waiting for a successful replay
    pub pending: usize,
    /// Queue length
    pub total: usize,
}

/// Why a drain did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyDraining,
    Offline,
    Empty,
}

/// Result of one [`SyncQueue::drain`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainOutcome {
    Skipped(SkipReason),
    /// Every pending entry replayed
    Completed { synced: usize, remaining: usize },
    /// A replay failed; it and everything behind it stay queued
    Stalled {
        synced: usize,
        remaining: usize,
        error: String,
    },
}

impl DrainOutcome {
    /// Number of entries confirmed by this drain
    pub const fn synced(&self) -> usize {
        match self {
            Self::Skipped(_) => 0,
            Self::Completed { synced, .. } | Self::Stalled { synced, .. } => *synced,
        }
    }
}

#[derive(Debug, Default)]
struct QueueState {
    entries: Vec<PendingMutation>,
    next_seq: u64,
    in_flight: Option<u64>,
    /// In-flight create that a newer write replaced before its replay ended
    replaced_create: Option<u64>,
    last_sync_at: Option<DateTime<Utc>>,
}

impl QueueState {
    fn stamp(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

/// Clears the in-progress flag however the drain exits.
struct DrainGuard<'a>(&'a AtomicBool);

impl<'a> DrainGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Ordered, deduplicated, persisted list of pending mutations
pub struct SyncQueue {
    store: Arc<dyn KeyValueStore>,
    connectivity: Connectivity,
    state: Mutex<QueueState>,
    draining: AtomicBool,
}

impl SyncQueue {
    /// Rebuild the queue from whatever the store holds.
    ///
    /// Entries already confirmed before the last shutdown are dropped; an
    /// unreadable queue is logged and replaced by an empty one.
    pub fn load(store: Arc<dyn KeyValueStore>, connectivity: Connectivity) -> Self {
        let mut state = QueueState::default();

        if let Some(raw) = store.get(SYNC_QUEUE_KEY) {
            match serde_json::from_value::<Vec<PendingMutation>>(raw) {
                Ok(entries) => {
                    for mut entry in entries.into_iter().filter(|entry| !entry.synced) {
                        entry.seq = state.stamp();
                        state.entries.push(entry);
                    }
                }
                Err(error) => {
                    tracing::warn!("Discarding unreadable sync queue: {}", error);
                }
            }
        }

        if !state.entries.is_empty() {
            tracing::info!(
                "Restored {} pending mutation(s) from local store",
                state.entries.len()
            );
        }

        Self {
            store,
            connectivity,
            state: Mutex::new(state),
            draining: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, state: &QueueState) {
        match serde_json::to_value(&state.entries) {
            Ok(value) => self.store.set(SYNC_QUEUE_KEY, &value),
            Err(error) => tracing::warn!("Failed to serialize sync queue: {}", error),
        }
    }

    pub const fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// Record a local write for later replay and persist the queue.
    ///
    /// An unconfirmed create followed by an update stays a create carrying
    /// the newer payload, so the remote side never sees an update for a
    /// record it has not been told about. An unconfirmed create followed by a
    /// delete cancels both; `None` is returned and nothing new is queued.
    pub fn enqueue(
        &self,
        kind: EntityKind,
        id: EntityId,
        mut action: MutationAction,
        data: Value,
    ) -> Option<PendingMutation> {
        let mut state = self.lock();
        let seq = state.stamp();

        let existing = state.entries.iter().position(|entry| {
            entry.targets(kind, &id) && entry.action != MutationAction::Delete
        });
        if let Some(index) = existing {
            let previous = state.entries.remove(index);
            let in_flight = state.in_flight == Some(previous.seq);
            if previous.action == MutationAction::Create && !previous.synced {
                if in_flight {
                    state.replaced_create = Some(previous.seq);
                } else if action == MutationAction::Update {
                    action = MutationAction::Create;
                } else if action == MutationAction::Delete {
                    self.persist(&state);
                    tracing::debug!("Dropped unsent create for deleted {} {}", kind, id);
                    return None;
                }
            }
        }

        let mutation = PendingMutation {
            id,
            kind,
            action,
            data,
            last_modified: Utc::now(),
            synced: false,
            seq,
        };
        state.entries.push(mutation.clone());
        self.persist(&state);

        tracing::debug!(
            "Queued {} for {} {} ({} pending)",
            mutation.action,
            mutation.kind,
            mutation.id,
            state.entries.len()
        );
        Some(mutation)
    }

    /// `failed` was a create that a newer write replaced while in flight. The
    /// record's first remaining entry now has to introduce it: an update
    /// becomes a create and a delete has nothing left to remove.
    fn restore_replaced_create(state: &mut QueueState, failed: &PendingMutation) {
        let Some(index) = state
            .entries
            .iter()
            .position(|entry| entry.targets(failed.kind, &failed.id))
        else {
            return;
        };
        match state.entries[index].action {
            MutationAction::Update => {
                state.entries[index].action = MutationAction::Create;
            }
            MutationAction::Delete => {
                state.entries.remove(index);
            }
            MutationAction::Create => {}
        }
    }

    /// Replay unsynced entries in queue order, one at a time.
    ///
    /// Does nothing while another drain runs, while offline, or when nothing
    /// is pending. The first failed replay ends the pass. Confirmed entries
    /// are removed and the queue persisted before returning.
    pub async fn drain<R: RemoteSync>(&self, remote: &R) -> DrainOutcome {
        let Some(_guard) = DrainGuard::acquire(&self.draining) else {
            return DrainOutcome::Skipped(SkipReason::AlreadyDraining);
        };
        if !self.connectivity.is_online() {
            return DrainOutcome::Skipped(SkipReason::Offline);
        }

        let pending = self
            .lock()
            .entries
            .iter()
            .filter(|entry| !entry.synced)
            .map(|entry| entry.seq)
            .collect::<Vec<_>>();
        if pending.is_empty() {
            return DrainOutcome::Skipped(SkipReason::Empty);
        }

        tracing::info!("Syncing {} pending mutation(s)", pending.len());
        let mut synced = 0usize;
        let mut failure = None;

        for seq in pending {
            let mutation = {
                let mut state = self.lock();
                let Some(entry) = state.entries.iter().find(|entry| entry.seq == seq) else {
                    // replaced by a newer write since the pass started
                    continue;
                };
                let mutation = entry.clone();
                state.in_flight = Some(seq);
                mutation
            };

            let result = remote.replay(&mutation).await;

            let mut state = self.lock();
            state.in_flight = None;
            let replaced = state.replaced_create.take() == Some(seq);
            match result {
                Ok(()) => {
                    if let Some(entry) = state.entries.iter_mut().find(|entry| entry.seq == seq) {
                        entry.synced = true;
                    }
                    synced += 1;
                }
                Err(error) => {
                    if replaced {
                        Self::restore_replaced_create(&mut state, &mutation);
                    }
                    tracing::warn!(
                        "Sync failed for {} {} {}: {}",
                        mutation.action,
                        mutation.kind,
                        mutation.id,
                        error
                    );
                    failure = Some(error.to_string());
                    break;
                }
            }
        }

        let remaining = {
            let mut state = self.lock();
            state.entries.retain(|entry| !entry.synced);
            if synced > 0 {
                state.last_sync_at = Some(Utc::now());
            }
            self.persist(&state);
            state.entries.len()
        };

        match failure {
            Some(error) => DrainOutcome::Stalled {
                synced,
                remaining,
                error,
            },
            None => {
                tracing::info!("Sync completed ({} replayed, {} left)", synced, remaining);
                DrainOutcome::Completed { synced, remaining }
            }
        }
    }

    pub fn status(&self) -> QueueStatus {
        let state = self.lock();
        QueueStatus {
            pending: state.entries.iter().filter(|entry| !entry.synced).count(),
            total: state.entries.len(),
        }
    }

    /// Snapshot of the queue in replay order
    pub fn entries(&self) -> Vec<PendingMutation> {
        self.lock().entries.clone()
    }

    /// Whether a drain is running right now
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Acquire)
    }

    /// When a drain last confirmed at least one entry
    pub fn last_sync_at(&self) -> Option<DateTime<Utc>> {
        self.lock().last_sync_at
    }

    /// Drop every queued entry. Only used when the whole local store is reset.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        self.store.remove(SYNC_QUEUE_KEY);
        tracing::info!("Cleared sync queue");
    }
}
