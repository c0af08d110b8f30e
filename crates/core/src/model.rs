use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A node in the clearance topology.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NodeId {
    Customer,
    Pos,
    Vsdc,
    Gateway,
    ValidationEngine,
    StateDb,
    Skmm,
    DailyKey,
    LocalCache,
    GraCloud,
}

impl NodeId {
    /// Wire name, as used in packet events.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeId::Customer => "customer",
            NodeId::Pos => "pos",
            NodeId::Vsdc => "vsdc",
            NodeId::Gateway => "gateway",
            NodeId::ValidationEngine => "validation_engine",
            NodeId::StateDb => "state_db",
            NodeId::Skmm => "skmm",
            NodeId::DailyKey => "daily_key",
            NodeId::LocalCache => "local_cache",
            NodeId::GraCloud => "gra_cloud",
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One directed edge of a fixed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopDescriptor {
    pub source: NodeId,
    pub target: NodeId,
    pub label: &'static str,
}

impl HopDescriptor {
    /// True if this hop goes from `source` to `target`.
    pub fn is(&self, source: NodeId, target: NodeId) -> bool {
        self.source == source && self.target == target
    }
}

/// Per-packet status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PacketStatus {
    Processing,
    Failed,
}

/// Terminal status of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunOutcome {
    /// Initialization handshake finished.
    Initialized,
    /// Transaction cleared through the gateway and committed.
    Committed,
    /// Gateway unreachable; the transaction was cached and signed locally.
    QueuedOffline,
}

/// Process-wide simulation flags.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SystemState {
    pub offline: bool,
    pub latency_ms: u64,
}

/// A single simulated message between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PacketEvent {
    pub tx_id: String,
    pub source: NodeId,
    pub target: NodeId,
    pub status: PacketStatus,
    pub timestamp_ms: i64,
    pub payload: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Terminal notification for a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionComplete {
    pub tx_id: String,
    pub status: RunOutcome,
}

/// Everything an observer of the feed can receive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FeedEvent {
    SystemState(SystemState),
    Packet(PacketEvent),
    TransactionComplete(TransactionComplete),
}

impl FeedEvent {
    /// Run id carried by the event, if any.
    pub fn tx_id(&self) -> Option<&str> {
        match self {
            FeedEvent::SystemState(_) => None,
            FeedEvent::Packet(p) => Some(&p.tx_id),
            FeedEvent::TransactionComplete(c) => Some(&c.tx_id),
        }
    }
}

/// The only modeled clearance failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClearanceError {
    #[error("GRA API is currently unreachable.")]
    Unavailable,
}

impl ClearanceError {
    /// HTTP-equivalent status code.
    pub fn http_status(&self) -> u16 {
        match self {
            ClearanceError::Unavailable => 503,
        }
    }
}
