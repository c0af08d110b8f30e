use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use clearance_core::api::{
    ClearanceRequest, ClearanceResponse, ErrorBody, LineItem, SetLatencyRequest,
    SetOfflineRequest, StateResponse, TriggerResponse,
};
use clearance_core::tax::{compute_taxes, RegimeComparison};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "clearancectl", about = "Operator console for the clearance simulator")]
struct Args {
    /// Daemon base URL.
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    daemon: String,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Show the simulator flags.
    State,
    /// Take the gateway offline (true) or bring it back (false).
    Offline {
        #[arg(action = clap::ArgAction::Set)]
        offline: bool,
    },
    /// Set the simulated network latency.
    Latency { ms: u64 },
    /// Start a simulated run.
    Simulate {
        #[arg(value_enum)]
        kind: SimulateKind,
    },
    /// Submit an invoice for clearance.
    Clear {
        #[arg(long, allow_negative_numbers = true)]
        total: f64,
        #[arg(long, default_value = "C0001234567")]
        tin: String,
    },
    /// Compute the tax block locally, without the daemon.
    Taxes {
        #[arg(long, allow_negative_numbers = true)]
        total: f64,
    },
    /// Compare the cascading and flat levy regimes for a base amount.
    Compare {
        #[arg(long)]
        base: f64,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SimulateKind {
    Initialization,
    Transaction,
}

impl SimulateKind {
    fn path(self) -> &'static str {
        match self {
            SimulateKind::Initialization => "/api/simulate/initialization",
            SimulateKind::Transaction => "/api/simulate/transaction",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let client = reqwest::Client::new();
    let base = args.daemon.trim_end_matches('/');

    match args.cmd {
        Cmd::State => {
            let resp: StateResponse = client
                .get(format!("{base}/api/system/state"))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            print_json(&resp)?;
        }
        Cmd::Offline { offline } => {
            let resp: StateResponse = client
                .post(format!("{base}/api/system/offline"))
                .json(&SetOfflineRequest { offline })
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            print_json(&resp)?;
        }
        Cmd::Latency { ms } => {
            let resp: StateResponse = client
                .post(format!("{base}/api/system/latency"))
                .json(&SetLatencyRequest { latency_ms: ms })
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            print_json(&resp)?;
        }
        Cmd::Simulate { kind } => {
            let resp: TriggerResponse = client
                .post(format!("{base}{}", kind.path()))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            print_json(&resp)?;
        }
        Cmd::Clear { total, tin } => {
            let req = ClearanceRequest {
                uuid: uuid::Uuid::new_v4().to_string(),
                company_tin: tin,
                items: vec![LineItem {
                    name: "Item".into(),
                    qty: 1.0,
                    price: total,
                }],
                total,
                tax_rate: None,
            };
            let resp = client
                .post(format!("{base}/api/vsdc/clearance"))
                .json(&req)
                .send()
                .await
                .context("send clearance request")?;
            if resp.status().is_success() {
                let cleared: ClearanceResponse = resp.json().await?;
                print_json(&cleared)?;
            } else {
                let status = resp.status();
                let body: ErrorBody = resp.json().await.context("parse error body")?;
                anyhow::bail!("clearance failed ({status}): {}", body.error);
            }
        }
        Cmd::Taxes { total } => {
            print_json(&compute_taxes(total))?;
        }
        Cmd::Compare { base: amount } => {
            let resp: RegimeComparison = client
                .get(format!("{base}/api/tax/compare?base={amount}"))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            print_json(&resp)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
