//! Wire types shared by the daemon, its HTTP clients and socket observers.

use serde::{Deserialize, Serialize};

use crate::model::SystemState;
use crate::tax::{format_amount, TaxBreakdown};
use crate::topology::RunKind;

/// Line item on a clearance request. Not interpreted by the simulator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub qty: f64,
    #[serde(default)]
    pub price: f64,
}

/// Invoice submitted for clearance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClearanceRequest {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub company_tin: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Tax-inclusive total.
    pub total: f64,
    /// Sent by point-of-sale clients; the simulator always assumes the flat rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<f64>,
}

/// Cleared invoice stamped by the simulated revenue authority.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClearanceResponse {
    pub distributor_tin: String,
    /// Invoice number.
    pub num: String,
    /// SDC id.
    pub ysdcid: String,
    /// Record number.
    pub ysdcrecnum: u32,
    /// Internal data token.
    pub ysdcintdata: String,
    /// Registration signature.
    pub ysdcregsig: String,
    pub ysdcmrctim: String,
    pub ysdctime: String,
    /// Verification URL.
    pub qr_code: String,
    pub status: String,
    pub computed_taxes: ComputedTaxes,
}

/// Tax block of a clearance response, amounts as 2-place strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComputedTaxes {
    pub base: String,
    pub vat: String,
    pub nhil: String,
    pub getfund: String,
    pub total_tax: String,
}

impl From<&TaxBreakdown> for ComputedTaxes {
    fn from(t: &TaxBreakdown) -> Self {
        Self {
            base: format_amount(t.base),
            vat: format_amount(t.vat),
            nhil: format_amount(t.nhil),
            getfund: format_amount(t.getfund),
            total_tax: format_amount(t.total_tax),
        }
    }
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

/// Health probe response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}

/// Operator request: toggle the simulated outage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SetOfflineRequest {
    pub offline: bool,
}

/// Operator request: set the simulated network latency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SetLatencyRequest {
    pub latency_ms: u64,
}

/// Response to a run trigger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResponse {
    pub tx_id: String,
    pub kind: RunKind,
}

/// Query of the regime comparison endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompareQuery {
    pub base: f64,
}

/// Commands accepted over the observer socket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "command", content = "value", rename_all = "snake_case")]
pub enum ClientCommand {
    SetOffline(bool),
    SetLatency(u64),
    SimulateInitialization,
    SimulateTransaction,
}

/// Snapshot returned by the state endpoint.
pub type StateResponse = SystemState;
