use std::sync::Arc;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use clearance_core::api::{ClearanceRequest, ClearanceResponse, ComputedTaxes};
use clearance_core::model::ClearanceError;
use clearance_core::short_id;
use clearance_core::tax::compute_taxes;
use rand::Rng;
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::StateStore;

/// Simulated revenue-authority clearance endpoint.
pub struct ClearanceResponder {
    state: Arc<StateStore>,
    verify_base_url: String,
}

impl ClearanceResponder {
    pub fn new(state: Arc<StateStore>, verify_base_url: impl Into<String>) -> Self {
        Self {
            state,
            verify_base_url: verify_base_url.into(),
        }
    }

    /// Clears an invoice.
    ///
    /// The simulated latency is applied before the outcome is decided, so failures are just as
    /// slow as successes. The outage flag is read after the delay.
    pub async fn clear(&self, req: &ClearanceRequest) -> Result<ClearanceResponse, ClearanceError> {
        let latency_ms = self.state.get().latency_ms;
        if latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(latency_ms)).await;
        }

        if self.state.get().offline {
            warn!(uuid = %req.uuid, latency_ms, "clearance refused: gateway offline");
            return Err(ClearanceError::Unavailable);
        }

        let taxes = compute_taxes(req.total);
        let now = Utc::now();
        let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let record_num = rand::thread_rng().gen_range(0..10_000);

        let resp = ClearanceResponse {
            distributor_tin: req.company_tin.clone(),
            num: format!("INV-{}", now.timestamp_millis()),
            ysdcid: format!("SDC-{}", short_id()),
            ysdcrecnum: record_num,
            ysdcintdata: format!("INT-{}", Uuid::new_v4()),
            ysdcregsig: format!("SIG-{}", Uuid::new_v4()),
            ysdcmrctim: stamp.clone(),
            ysdctime: stamp,
            qr_code: format!(
                "{}/{}",
                self.verify_base_url.trim_end_matches('/'),
                Uuid::new_v4()
            ),
            status: "CLEARED".to_string(),
            computed_taxes: ComputedTaxes::from(&taxes),
        };

        info!(uuid = %req.uuid, num = %resp.num, total = req.total, "invoice cleared");
        Ok(resp)
    }
}
