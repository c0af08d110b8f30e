//! Fixed hop tables and the scripted offline fallback.
//!
//! Each [`RunKind`] owns an immutable, ordered hop table together with its tick interval and
//! branching policy. The offline fallback is a flat list of `(offset, packet)` steps played
//! relative to the moment the nominal sequence was abandoned.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::model::{HopDescriptor, NodeId, PacketStatus, RunOutcome, SystemState};
use crate::short_id;

const fn hop(source: NodeId, target: NodeId, label: &'static str) -> HopDescriptor {
    HopDescriptor {
        source,
        target,
        label,
    }
}

/// Start-of-day key handshake.
pub const INITIALIZATION_HOPS: [HopDescriptor; 3] = [
    hop(NodeId::Pos, NodeId::Skmm, "1. Start of Day Request"),
    hop(NodeId::Skmm, NodeId::DailyKey, "2. Authorize & Issue"),
    hop(NodeId::DailyKey, NodeId::Vsdc, "Loads Auth Key"),
];

/// Online clearance round trip.
pub const TRANSACTION_HOPS: [HopDescriptor; 9] = [
    hop(NodeId::Customer, NodeId::Pos, "3. Presents Items"),
    hop(NodeId::Pos, NodeId::Vsdc, "4. Format JSON"),
    hop(NodeId::Vsdc, NodeId::Gateway, "5. HTTPS POST"),
    hop(NodeId::Gateway, NodeId::ValidationEngine, "6. Route for Clearance"),
    hop(NodeId::ValidationEngine, NodeId::StateDb, "8. Commit Transaction"),
    hop(NodeId::ValidationEngine, NodeId::Gateway, "9. Return Metadata"),
    hop(NodeId::Gateway, NodeId::Vsdc, "10. HTTP 200 OK"),
    hop(NodeId::Vsdc, NodeId::Pos, "11. Cryptographic Clearance"),
    hop(NodeId::Pos, NodeId::Customer, "12. Print Certified Receipt"),
];

/// Tick interval of an initialization run.
pub const INITIALIZATION_INTERVAL: Duration = Duration::from_millis(2_000);

/// Base tick interval of a transaction run, before latency is added.
pub const TRANSACTION_BASE_INTERVAL: Duration = Duration::from_millis(4_000);

/// Kind of simulated run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    Initialization,
    Transaction,
}

impl RunKind {
    /// Ordered hops of the nominal sequence.
    pub fn hops(self) -> &'static [HopDescriptor] {
        match self {
            RunKind::Initialization => &INITIALIZATION_HOPS,
            RunKind::Transaction => &TRANSACTION_HOPS,
        }
    }

    /// Time between ticks. Transaction runs slow down by a fifth of the simulated latency.
    pub fn tick_interval(self, latency_ms: u64) -> Duration {
        match self {
            RunKind::Initialization => INITIALIZATION_INTERVAL,
            RunKind::Transaction => {
                TRANSACTION_BASE_INTERVAL + Duration::from_micros(latency_ms.saturating_mul(200))
            }
        }
    }

    /// Terminal status when every hop was emitted.
    pub fn completion(self) -> RunOutcome {
        match self {
            RunKind::Initialization => RunOutcome::Initialized,
            RunKind::Transaction => RunOutcome::Committed,
        }
    }

    /// Whether the nominal sequence must be abandoned before emitting `hop`.
    ///
    /// Only transaction runs branch, and only at the outbound gateway call.
    pub fn diverts_at(self, hop: &HopDescriptor, state: &SystemState) -> bool {
        self == RunKind::Transaction && state.offline && hop.is(NodeId::Vsdc, NodeId::Gateway)
    }

    /// Fresh run id. Initialization runs get a short prefixed id.
    pub fn new_tx_id(self) -> String {
        match self {
            RunKind::Initialization => format!("INIT-{}", short_id()),
            RunKind::Transaction => uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Payload attached to a nominal hop packet.
    pub fn hop_payload(self, hop: &HopDescriptor) -> Map<String, Value> {
        let value = match self {
            RunKind::Initialization => json!({ "step": hop.label, "type": "SECURITY_HANDSHAKE" }),
            RunKind::Transaction => json!({ "step": hop.label, "data": "Sample Payload Data" }),
        };
        into_map(value)
    }
}

/// One packet of the offline fallback, scheduled at `offset` after divergence.
#[derive(Debug, Clone, Copy)]
pub struct ScriptStep {
    pub offset: Duration,
    pub source: NodeId,
    pub target: NodeId,
    pub status: PacketStatus,
    pub label: &'static str,
    pub error: Option<&'static str>,
    payload: fn() -> Value,
}

impl ScriptStep {
    /// Packet payload for this step.
    pub fn payload(&self) -> Map<String, Value> {
        let mut map = into_map((self.payload)());
        map.insert("step".into(), Value::from(self.label));
        map
    }
}

fn connection_refused() -> Value {
    json!({ "error": "Connection Refused", "retry_after": 30 })
}

fn service_unavailable() -> Value {
    json!({ "status": 503, "message": "Service Unavailable" })
}

fn cache_transaction() -> Value {
    json!({ "action": "CACHE_TRANSACTION", "reason": "OFFLINE" })
}

fn provisional_receipt() -> Value {
    json!({
        "receipt_type": "PROVISIONAL",
        "footer": "Sync Pending",
        "signature": "LOCAL-SIG-TEMP",
        "mode": "OFFLINE",
    })
}

/// Offline fallback, in emission order. The run terminates with [`OFFLINE_OUTCOME`]
/// immediately after the last step.
pub const OFFLINE_SCRIPT: [ScriptStep; 4] = [
    ScriptStep {
        offset: Duration::ZERO,
        source: NodeId::Vsdc,
        target: NodeId::Gateway,
        status: PacketStatus::Failed,
        label: "5. HTTPS POST",
        error: Some("Connection Timeout (503)"),
        payload: connection_refused,
    },
    ScriptStep {
        offset: Duration::from_millis(2_500),
        source: NodeId::Gateway,
        target: NodeId::Vsdc,
        status: PacketStatus::Failed,
        label: "API Timeout / Disconnect",
        error: None,
        payload: service_unavailable,
    },
    ScriptStep {
        offset: Duration::from_millis(5_000),
        source: NodeId::Vsdc,
        target: NodeId::LocalCache,
        status: PacketStatus::Processing,
        label: "Connection Lost (>2s latency)",
        error: None,
        payload: cache_transaction,
    },
    ScriptStep {
        offset: Duration::from_millis(7_500),
        source: NodeId::Pos,
        target: NodeId::Customer,
        status: PacketStatus::Processing,
        label: "12. Print Certified Receipt",
        error: None,
        payload: provisional_receipt,
    },
];

/// Terminal status of a run that took the offline fallback.
pub const OFFLINE_OUTCOME: RunOutcome = RunOutcome::QueuedOffline;

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
