//! Manual integration checks for a gateway's deep-thinking feature.
//!
//! Issues the fixed scenarios against a running gateway and prints
//! human-readable pass/fail lines. Exits non-zero if any scenario failed.
//!
//! ```text
//! thinkcheck --base-url http://localhost:8080 --api-key ak_...
//! ```

mod checks;
mod report;

use std::process::ExitCode;

use clap::Parser;
use thinkcheck_client::{GatewayClient, ServiceHealth, probe};

/// Command-line options.
#[derive(Debug, Parser)]
#[command(name = "thinkcheck", version, about = "Exercise a gateway's deep-thinking feature")]
struct Args {
    /// Gateway base URL.
    #[arg(long, env = "THINKCHECK_BASE_URL", default_value = "http://localhost:8080")]
    base_url: String,

    /// API key sent as a bearer token.
    #[arg(long, env = "THINKCHECK_API_KEY")]
    api_key: String,

    /// Model requested in every scenario.
    #[arg(long, env = "THINKCHECK_MODEL", default_value = "gpt-3.5-turbo")]
    model: String,

    /// Run the scenarios even if the health probe fails.
    #[arg(long)]
    skip_health: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let client = GatewayClient::new()
        .base_url(args.base_url.clone())
        .api_key(args.api_key.clone())
        .model(args.model.clone());

    report::banner("Gateway deep-thinking checks");

    let health = probe(&client).await;
    match &health {
        ServiceHealth::Healthy => report::pass("gateway is up"),
        ServiceHealth::AuthRejected => {
            report::warn("gateway is up but rejected the API key; expect auth failures below");
        }
        ServiceHealth::Unhealthy { status } => {
            report::fail(&format!("gateway answered HTTP {status}"));
        }
        ServiceHealth::Unreachable { reason } => {
            report::fail(&format!("cannot connect to the gateway: {reason}"));
        }
    }
    if !health.is_reachable() {
        report::info(&format!("check that the gateway is running at {}", args.base_url));
        report::info("check that the API key is valid and nothing blocks the connection");
        if !args.skip_health {
            report::info("pass --skip-health to run the scenarios anyway");
            return ExitCode::FAILURE;
        }
    }

    report::info(&format!("using API key {}", report::mask_key(&args.api_key)));

    let outcomes = checks::run_all(&client).await;
    report::summary(&outcomes);

    if outcomes.iter().all(|o| o.passed) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
