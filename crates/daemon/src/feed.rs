//! Fan-out of simulator events to every attached observer.

use clearance_core::model::{FeedEvent, SystemState};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

#[derive(Clone)]
pub struct Broadcaster {
    tx: broadcast::Sender<FeedEvent>,
}

impl Broadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Delivers `event` to all current observers. Returns how many received it.
    pub fn publish(&self, event: FeedEvent) -> usize {
        match self.tx.send(event) {
            Ok(n) => n,
            Err(_) => {
                debug!("no observers attached; event dropped");
                0
            }
        }
    }

    pub fn observers(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Attaches an observer that first sees `snapshot`, then live events only.
    pub(crate) fn attach(&self, snapshot: impl FnOnce() -> SystemState) -> Subscription {
        // Subscribe before reading the snapshot so no mutation slips between the two.
        let rx = self.tx.subscribe();
        Subscription {
            pending: Some(FeedEvent::SystemState(snapshot())),
            rx,
        }
    }
}

/// One observer's view of the feed.
pub struct Subscription {
    pending: Option<FeedEvent>,
    rx: broadcast::Receiver<FeedEvent>,
}

impl Subscription {
    /// Next event, or `None` once the broadcaster is gone.
    pub async fn next(&mut self) -> Option<FeedEvent> {
        if let Some(ev) = self.pending.take() {
            return Some(ev);
        }
        loop {
            match self.rx.recv().await {
                Ok(ev) => return Some(ev),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "observer lagging; events skipped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
