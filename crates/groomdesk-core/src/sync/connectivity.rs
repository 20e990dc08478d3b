//! Online/offline tracking and drain-on-reconnect.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use super::queue::{DrainOutcome, SyncQueue};
use crate::remote::RemoteSync;

/// Shared online flag.
///
/// Cheap to clone; every clone observes the same state.
#[derive(Debug, Clone)]
pub struct Connectivity {
    online: Arc<AtomicBool>,
}

impl Connectivity {
    pub fn new(initially_online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(initially_online)),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    /// Update the flag, returning `true` if the state changed.
    pub fn set_online(&self, online: bool) -> bool {
        self.online.swap(online, Ordering::AcqRel) != online
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Connectivity signal delivered to the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    Online,
    Offline,
}

/// Consumes connectivity events and drains the queue whenever the
/// connection comes back.
pub struct ConnectivityMonitor<R> {
    queue: Arc<SyncQueue>,
    remote: Arc<R>,
    events: mpsc::Receiver<ConnectivityEvent>,
}

impl<R: RemoteSync> ConnectivityMonitor<R> {
    /// Create a monitor over `queue`.
    ///
    /// Returns the monitor and the sender used to feed it events.
    pub fn new(queue: Arc<SyncQueue>, remote: Arc<R>) -> (Self, mpsc::Sender<ConnectivityEvent>) {
        let (event_tx, events) = mpsc::channel(16);
        let monitor = Self {
            queue,
            remote,
            events,
        };
        (monitor, event_tx)
    }

    /// Apply one event. Only an offline to online transition drains; a
    /// repeated `Online` is ignored.
    pub async fn handle_event(&self, event: ConnectivityEvent) -> Option<DrainOutcome> {
        let connectivity = self.queue.connectivity();
        match event {
            ConnectivityEvent::Offline => {
                if connectivity.set_online(false) {
                    tracing::info!("Connection lost, writes will be queued");
                }
                None
            }
            ConnectivityEvent::Online => {
                if !connectivity.set_online(true) {
                    return None;
                }
                tracing::info!("Connection restored, draining sync queue");
                Some(self.queue.drain(self.remote.as_ref()).await)
            }
        }
    }

    /// Process events until every sender is dropped.
    pub async fn run(mut self) {
        while let Some(event) = self.events.recv().await {
            if let Some(outcome) = self.handle_event(event).await {
                tracing::debug!("Reconnect drain finished: {:?}", outcome);
            }
        }
        tracing::debug!("Connectivity monitor stopped");
    }
}
