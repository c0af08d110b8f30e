#![forbid(unsafe_code)]

//! Clearance simulator daemon: serves the clearance endpoint, operator commands and the
//! observer feed.

use std::{net::SocketAddr, sync::Arc};

use clap::Parser;
use clearance_core::model::SystemState;
use clearance_daemon::config::{DaemonConfig, DEFAULT_FEED_CAPACITY, DEFAULT_VERIFY_BASE_URL};
use clearance_daemon::{http, service::SimulatorService};
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "clearance-daemon", version, about = "VSDC clearance flow simulator")]
struct Args {
    /// Listen address, e.g. 0.0.0.0:3000
    #[arg(long, default_value = "0.0.0.0:3000")]
    listen: SocketAddr,

    /// Log level (env-filter syntax).
    #[arg(long, default_value = "info")]
    log: String,

    /// Start with the gateway offline.
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Initial simulated network latency in milliseconds.
    #[arg(long, default_value_t = 0)]
    latency_ms: u64,

    /// Prefix of the verification URL on cleared receipts.
    #[arg(long, default_value = DEFAULT_VERIFY_BASE_URL)]
    verify_base_url: String,

    /// Events buffered per observer before it starts skipping.
    #[arg(long, default_value_t = DEFAULT_FEED_CAPACITY)]
    feed_capacity: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&args.log))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = DaemonConfig {
        listen: args.listen,
        initial_state: SystemState {
            offline: args.offline,
            latency_ms: args.latency_ms,
        },
        verify_base_url: args.verify_base_url,
        feed_capacity: args.feed_capacity,
    };
    config.validate()?;
    tracing::info!(?config, "starting daemon");

    let svc = Arc::new(SimulatorService::new(&config));

    let app = http::router(svc)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!(listen = %config.listen, "listening");
    axum::serve(tokio::net::TcpListener::bind(config.listen).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    tracing::info!("shutdown requested");
}
