//! WebSocket observer feed.
//!
//! Each socket gets the current system state on connect, then every feed event as a JSON text
//! frame. Text frames sent by the client are parsed as operator commands.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use clearance_core::api::ClientCommand;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::http::AppState;
use crate::service::SimulatorService;

pub async fn feed_socket(ws: WebSocketUpgrade, State(st): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| serve_observer(socket, st.svc))
}

async fn serve_observer(socket: WebSocket, svc: Arc<SimulatorService>) {
    let observer = Uuid::new_v4();
    info!(%observer, "observer attached");

    let (mut sink, mut stream) = socket.split();
    let mut sub = svc.attach();

    let forward = tokio::spawn(async move {
        while let Some(ev) = sub.next().await {
            let text = match serde_json::to_string(&ev) {
                Ok(t) => t,
                Err(e) => {
                    warn!(%observer, error = %e, "failed to encode feed event");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg) = stream.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientCommand>(text.as_str()) {
                Ok(cmd) => {
                    debug!(%observer, ?cmd, "command");
                    if let Some(tx_id) = svc.apply(cmd) {
                        debug!(%observer, %tx_id, "run triggered");
                    }
                }
                Err(e) => warn!(%observer, error = %e, "ignoring malformed command"),
            },
            Ok(Message::Close(frame)) => {
                debug!(%observer, ?frame, "close frame");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(%observer, error = %e, "socket error");
                break;
            }
        }
    }

    forward.abort();
    info!(%observer, "observer detached");
}
