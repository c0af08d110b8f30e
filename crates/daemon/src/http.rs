use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clearance_core::api::{
    ClearanceRequest, ClearanceResponse, CompareQuery, ErrorBody, HealthResponse,
    SetLatencyRequest, SetOfflineRequest, StateResponse, TriggerResponse,
};
use clearance_core::model::ClearanceError;
use clearance_core::tax::{compare_regimes, RegimeComparison};
use clearance_core::topology::RunKind;

use crate::service::SimulatorService;
use crate::ws;

#[derive(Clone)]
pub struct AppState {
    pub(crate) svc: Arc<SimulatorService>,
}

pub fn router(svc: Arc<SimulatorService>) -> Router {
    let state = AppState { svc };
    Router::new()
        .route("/api/health", get(health))
        .route("/api/system/state", get(system_state))
        .route("/api/system/offline", post(set_offline))
        .route("/api/system/latency", post(set_latency))
        .route("/api/simulate/initialization", post(simulate_initialization))
        .route("/api/simulate/transaction", post(simulate_transaction))
        .route("/api/vsdc/clearance", post(clearance))
        .route("/api/tax/compare", get(compare))
        .route("/ws", get(ws::feed_socket))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

async fn system_state(State(st): State<AppState>) -> Json<StateResponse> {
    Json(st.svc.system_state())
}

async fn set_offline(
    State(st): State<AppState>,
    Json(req): Json<SetOfflineRequest>,
) -> Json<StateResponse> {
    st.svc.set_offline(req.offline);
    Json(st.svc.system_state())
}

async fn set_latency(
    State(st): State<AppState>,
    Json(req): Json<SetLatencyRequest>,
) -> Json<StateResponse> {
    st.svc.set_latency(req.latency_ms);
    Json(st.svc.system_state())
}

async fn simulate_initialization(State(st): State<AppState>) -> (StatusCode, Json<TriggerResponse>) {
    trigger(&st, RunKind::Initialization)
}

async fn simulate_transaction(State(st): State<AppState>) -> (StatusCode, Json<TriggerResponse>) {
    trigger(&st, RunKind::Transaction)
}

fn trigger(st: &AppState, kind: RunKind) -> (StatusCode, Json<TriggerResponse>) {
    let tx_id = st.svc.trigger(kind);
    (StatusCode::ACCEPTED, Json(TriggerResponse { tx_id, kind }))
}

async fn clearance(
    State(st): State<AppState>,
    Json(req): Json<ClearanceRequest>,
) -> Result<Json<ClearanceResponse>, AppError> {
    let resp = st.svc.clear(&req).await?;
    Ok(Json(resp))
}

async fn compare(Query(q): Query<CompareQuery>) -> Json<RegimeComparison> {
    Json(compare_regimes(q.base))
}

#[derive(Debug)]
pub struct AppError(ClearanceError);

impl From<ClearanceError> for AppError {
    fn from(value: ClearanceError) -> Self {
        Self(value)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(ErrorBody {
            error: self.0.to_string(),
        });
        (code, body).into_response()
    }
}
