//! Routes exercised in-process through the router.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use clearance_core::model::SystemState;
use clearance_daemon::config::DaemonConfig;
use clearance_daemon::http::router;
use clearance_daemon::service::SimulatorService;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(offline: bool) -> (Arc<SimulatorService>, Router) {
    let cfg = DaemonConfig {
        initial_state: SystemState { offline, latency_ms: 0 },
        ..Default::default()
    };
    let svc = Arc::new(SimulatorService::new(&cfg));
    (Arc::clone(&svc), router(svc))
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let resp = app.oneshot(req.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn invoice() -> Value {
    json!({
        "uuid": "inv-1",
        "company_tin": "C0001234567",
        "items": [{ "name": "Laptop", "qty": 1, "price": 6000 }],
        "tax_rate": 0.20,
        "total": 6000
    })
}

#[tokio::test]
async fn health_is_ok() {
    let (_svc, app) = app(false);
    let (status, body) = send(app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn clearance_returns_stamped_invoice() {
    let (_svc, app) = app(false);
    let (status, body) = send(app, "POST", "/api/vsdc/clearance", Some(invoice())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "CLEARED");
    assert_eq!(body["distributor_tin"], "C0001234567");
    assert_eq!(
        body["computed_taxes"],
        json!({
            "base": "5000.00",
            "vat": "750.00",
            "nhil": "125.00",
            "getfund": "125.00",
            "total_tax": "1000.00"
        })
    );
    assert!(body["ysdcrecnum"].as_u64().unwrap() < 10_000);
    assert!(body["qr_code"].as_str().unwrap().starts_with("https://gra.gov.gh/verify/"));
}

#[tokio::test]
async fn clearance_offline_is_503() {
    let (_svc, app) = app(true);
    let (status, body) = send(app, "POST", "/api/vsdc/clearance", Some(invoice())).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({ "error": "GRA API is currently unreachable." }));
}

#[tokio::test]
async fn operator_routes_update_state() {
    let (svc, app) = app(false);

    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/system/offline",
        Some(json!({ "offline": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "offline": true, "latencyMs": 0 }));

    let (status, _) = send(
        app.clone(),
        "POST",
        "/api/system/latency",
        Some(json!({ "latency_ms": 750 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(app, "GET", "/api/system/state", None).await;
    assert_eq!(body, json!({ "offline": true, "latencyMs": 750 }));
    assert_eq!(svc.system_state(), SystemState { offline: true, latency_ms: 750 });
}

#[tokio::test]
async fn negative_latency_is_rejected() {
    let (svc, app) = app(false);
    let (status, _) = send(
        app,
        "POST",
        "/api/system/latency",
        Some(json!({ "latency_ms": -5 })),
    )
    .await;
    assert!(status.is_client_error());
    assert_eq!(svc.system_state().latency_ms, 0);
}

#[tokio::test(start_paused = true)]
async fn triggers_are_accepted_with_run_id() {
    let (_svc, app) = app(false);

    let (status, body) = send(app.clone(), "POST", "/api/simulate/initialization", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["kind"], "initialization");
    assert!(body["txId"].as_str().unwrap().starts_with("INIT-"));

    let (status, body) = send(app, "POST", "/api/simulate/transaction", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["kind"], "transaction");
    assert_eq!(body["txId"].as_str().unwrap().len(), 36);
}

#[tokio::test]
async fn compare_regimes_by_query() {
    let (_svc, app) = app(false);
    let (status, body) = send(app, "GET", "/api/tax/compare?base=1000", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flat"]["total"], 1200.0);
    assert_eq!(body["cascading"]["total"], 1207.5);
}
