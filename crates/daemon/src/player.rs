//! Timed playback of hop sequences.
//!
//! A run emits one packet per tick in topology order. The tick interval is fixed when the run
//! starts; the outage flag is re-read at every tick. A transaction run that reaches the gateway
//! call while the gateway is offline abandons the nominal sequence and plays
//! [`OFFLINE_SCRIPT`] relative to that tick instead.

use std::sync::Arc;

use clearance_core::model::{
    FeedEvent, HopDescriptor, PacketEvent, PacketStatus, RunOutcome, TransactionComplete,
};
use clearance_core::now_ms;
use clearance_core::topology::{RunKind, ScriptStep, OFFLINE_OUTCOME, OFFLINE_SCRIPT};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::state::StateStore;

#[derive(Clone)]
pub struct SequencePlayer {
    state: Arc<StateStore>,
}

/// Bookkeeping of a single run, owned by the task playing it.
#[derive(Debug)]
struct TransactionRun {
    tx_id: String,
    kind: RunKind,
    cursor: usize,
    started_at: Instant,
    terminal: bool,
}

impl TransactionRun {
    fn new(kind: RunKind, tx_id: String) -> Self {
        Self {
            tx_id,
            kind,
            cursor: 0,
            started_at: Instant::now(),
            terminal: false,
        }
    }

    fn next_hop(&self) -> Option<&'static HopDescriptor> {
        debug_assert!(!self.terminal, "run {} already finished", self.tx_id);
        self.kind.hops().get(self.cursor)
    }

    fn advance(&mut self) {
        self.cursor += 1;
    }

    fn finish(&mut self, status: RunOutcome) -> TransactionComplete {
        self.terminal = true;
        TransactionComplete {
            tx_id: self.tx_id.clone(),
            status,
        }
    }
}

impl SequencePlayer {
    pub fn new(state: Arc<StateStore>) -> Self {
        Self { state }
    }

    /// Starts a run in the background and returns its id. Runs are never cancelled.
    pub fn trigger(&self, kind: RunKind) -> String {
        let tx_id = kind.new_tx_id();
        let player = self.clone();
        let id = tx_id.clone();
        tokio::spawn(async move {
            player.play(kind, id).await;
        });
        tx_id
    }

    /// Plays a run to its terminal event.
    pub async fn play(&self, kind: RunKind, tx_id: String) -> RunOutcome {
        let interval = kind.tick_interval(self.state.get().latency_ms);
        let mut run = TransactionRun::new(kind, tx_id);
        info!(tx_id = %run.tx_id, ?kind, interval_ms = interval.as_millis() as u64, "run started");

        let mut tick_at = run.started_at;
        let outcome = loop {
            tick_at += interval;
            sleep_until(tick_at).await;

            let Some(hop) = run.next_hop() else {
                break kind.completion();
            };

            if kind.diverts_at(hop, &self.state.get()) {
                warn!(tx_id = %run.tx_id, hop = run.cursor, "gateway unreachable; falling back to offline path");
                self.play_offline(&run, tick_at).await;
                break OFFLINE_OUTCOME;
            }

            self.emit(PacketEvent {
                tx_id: run.tx_id.clone(),
                source: hop.source,
                target: hop.target,
                status: PacketStatus::Processing,
                timestamp_ms: now_ms(),
                payload: kind.hop_payload(hop),
                error: None,
            });
            run.advance();
        };

        let complete = run.finish(outcome);
        info!(
            tx_id = %complete.tx_id,
            status = ?complete.status,
            elapsed_ms = run.started_at.elapsed().as_millis() as u64,
            "run complete"
        );
        self.state.feed().publish(FeedEvent::TransactionComplete(complete));
        outcome
    }

    async fn play_offline(&self, run: &TransactionRun, diverged_at: Instant) {
        for step in &OFFLINE_SCRIPT {
            let due = diverged_at + step.offset;
            if Instant::now() < due {
                sleep_until(due).await;
            }
            self.emit(scripted_packet(&run.tx_id, step));
        }
    }

    fn emit(&self, packet: PacketEvent) {
        debug!(
            tx_id = %packet.tx_id,
            source = %packet.source,
            target = %packet.target,
            status = ?packet.status,
            "packet"
        );
        self.state.feed().publish(FeedEvent::Packet(packet));
    }
}

fn scripted_packet(tx_id: &str, step: &ScriptStep) -> PacketEvent {
    PacketEvent {
        tx_id: tx_id.to_string(),
        source: step.source,
        target: step.target,
        status: step.status,
        timestamp_ms: now_ms(),
        payload: step.payload(),
        error: step.error.map(str::to_string),
    }
}
