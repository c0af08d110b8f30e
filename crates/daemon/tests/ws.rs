//! Operator commands and the `/ws` observer feed.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clearance_core::api::ClientCommand;
use clearance_core::model::{FeedEvent, NodeId, SystemState};
use clearance_daemon::config::DaemonConfig;
use clearance_daemon::feed::Subscription;
use clearance_daemon::http::router;
use clearance_daemon::service::SimulatorService;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

fn service() -> Arc<SimulatorService> {
    Arc::new(SimulatorService::new(&DaemonConfig::default()))
}

fn snapshot(offline: bool, latency_ms: u64) -> Option<FeedEvent> {
    Some(FeedEvent::SystemState(SystemState { offline, latency_ms }))
}

/// Skips events until the first packet of `tx_id`.
async fn first_packet_source(sub: &mut Subscription, tx_id: &str) -> NodeId {
    while let Some(event) = sub.next().await {
        if let FeedEvent::Packet(p) = event {
            if p.tx_id == tx_id {
                return p.source;
            }
        }
    }
    panic!("feed closed before {tx_id} emitted a packet");
}

#[tokio::test(start_paused = true)]
async fn commands_update_state_and_start_runs() {
    let svc = service();
    let mut sub = svc.attach();
    assert_eq!(sub.next().await, snapshot(false, 0));

    assert_eq!(svc.apply(ClientCommand::SetOffline(true)), None);
    assert_eq!(sub.next().await, snapshot(true, 0));

    assert_eq!(svc.apply(ClientCommand::SetLatency(250)), None);
    assert_eq!(sub.next().await, snapshot(true, 250));
    assert_eq!(svc.system_state(), SystemState { offline: true, latency_ms: 250 });

    let init = svc
        .apply(ClientCommand::SimulateInitialization)
        .expect("initialization run id");
    assert!(init.starts_with("INIT-"));
    assert_eq!(first_packet_source(&mut sub, &init).await, NodeId::Pos);

    let tx = svc
        .apply(ClientCommand::SimulateTransaction)
        .expect("transaction run id");
    assert_eq!(tx.len(), 36);
    assert_eq!(first_packet_source(&mut sub, &tx).await, NodeId::Customer);
}

async fn serve(svc: Arc<SimulatorService>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router(svc)).await });
    addr
}

async fn connect(addr: SocketAddr) -> Client {
    let (ws, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    ws
}

async fn next_json(ws: &mut Client) -> Value {
    loop {
        let msg = timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("frame within 5s")
            .expect("socket open")
            .expect("valid frame");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

async fn send_json(ws: &mut Client, value: Value) {
    ws.send(Message::Text(value.to_string())).await.unwrap();
}

#[tokio::test]
async fn socket_gets_state_on_connect_and_broadcasts_commands() {
    let svc = service();
    let addr = serve(Arc::clone(&svc)).await;

    let mut operator = connect(addr).await;
    let mut watcher = connect(addr).await;
    let initial = json!({ "event": "system_state", "offline": false, "latencyMs": 0 });
    assert_eq!(next_json(&mut operator).await, initial);
    assert_eq!(next_json(&mut watcher).await, initial);

    send_json(&mut operator, json!({ "command": "set_offline", "value": true })).await;

    let expected = json!({ "event": "system_state", "offline": true, "latencyMs": 0 });
    assert_eq!(next_json(&mut operator).await, expected);
    assert_eq!(next_json(&mut watcher).await, expected);
    assert!(svc.system_state().offline);
}

#[tokio::test]
async fn malformed_socket_command_is_ignored() {
    let svc = service();
    let addr = serve(Arc::clone(&svc)).await;

    let mut ws = connect(addr).await;
    let _ = next_json(&mut ws).await;

    ws.send(Message::Text("not a command".into())).await.unwrap();
    send_json(&mut ws, json!({ "command": "set_latency", "value": 400 })).await;

    assert_eq!(
        next_json(&mut ws).await,
        json!({ "event": "system_state", "offline": false, "latencyMs": 400 })
    );
    assert_eq!(svc.system_state().latency_ms, 400);
}
