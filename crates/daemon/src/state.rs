use clearance_core::model::{FeedEvent, SystemState};
use tokio::sync::watch;
use tracing::info;

use crate::feed::{Broadcaster, Subscription};

/// Process-wide simulation flags. Every mutation is broadcast as a full snapshot.
pub struct StateStore {
    state: watch::Sender<SystemState>,
    feed: Broadcaster,
}

impl StateStore {
    pub fn new(initial: SystemState, feed: Broadcaster) -> Self {
        Self {
            state: watch::Sender::new(initial),
            feed,
        }
    }

    pub fn get(&self) -> SystemState {
        *self.state.borrow()
    }

    pub fn set_offline(&self, offline: bool) {
        self.update(|s| s.offline = offline);
        info!(offline, "simulated outage toggled");
    }

    pub fn set_latency(&self, latency_ms: u64) {
        self.update(|s| s.latency_ms = latency_ms);
        info!(latency_ms, "simulated latency set");
    }

    /// Attaches an observer: it receives the current state immediately, then every later event.
    pub fn attach(&self) -> Subscription {
        self.feed.attach(|| self.get())
    }

    pub fn feed(&self) -> &Broadcaster {
        &self.feed
    }

    fn update(&self, apply: impl FnOnce(&mut SystemState)) {
        // Publish while holding the write lock so observers see snapshots in write order.
        self.state.send_modify(|s| {
            apply(s);
            self.feed.publish(FeedEvent::SystemState(*s));
        });
    }
}
