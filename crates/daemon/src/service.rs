use std::sync::Arc;

use clearance_core::api::{ClearanceRequest, ClearanceResponse, ClientCommand};
use clearance_core::model::{ClearanceError, SystemState};
use clearance_core::topology::RunKind;

use crate::clearance::ClearanceResponder;
use crate::config::DaemonConfig;
use crate::feed::{Broadcaster, Subscription};
use crate::player::SequencePlayer;
use crate::state::StateStore;

/// Main service wiring the state store, player and clearance responder together.
pub struct SimulatorService {
    state: Arc<StateStore>,
    player: SequencePlayer,
    responder: ClearanceResponder,
}

impl SimulatorService {
    pub fn new(cfg: &DaemonConfig) -> Self {
        let feed = Broadcaster::new(cfg.feed_capacity);
        let state = Arc::new(StateStore::new(cfg.initial_state, feed));
        Self {
            player: SequencePlayer::new(Arc::clone(&state)),
            responder: ClearanceResponder::new(Arc::clone(&state), cfg.verify_base_url.clone()),
            state,
        }
    }

    pub fn system_state(&self) -> SystemState {
        self.state.get()
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.set_offline(offline);
    }

    pub fn set_latency(&self, latency_ms: u64) {
        self.state.set_latency(latency_ms);
    }

    /// Starts a run and returns its id.
    pub fn trigger(&self, kind: RunKind) -> String {
        self.player.trigger(kind)
    }

    pub async fn clear(&self, req: &ClearanceRequest) -> Result<ClearanceResponse, ClearanceError> {
        self.responder.clear(req).await
    }

    pub fn attach(&self) -> Subscription {
        self.state.attach()
    }

    /// Applies an operator command. Returns the run id for triggers.
    pub fn apply(&self, cmd: ClientCommand) -> Option<String> {
        match cmd {
            ClientCommand::SetOffline(offline) => {
                self.set_offline(offline);
                None
            }
            ClientCommand::SetLatency(ms) => {
                self.set_latency(ms);
                None
            }
            ClientCommand::SimulateInitialization => Some(self.trigger(RunKind::Initialization)),
            ClientCommand::SimulateTransaction => Some(self.trigger(RunKind::Transaction)),
        }
    }
}
