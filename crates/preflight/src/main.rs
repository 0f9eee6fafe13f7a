//! Environment preflight for the document-conversion engine.
//!
//! Checks the same things `initialize()` checks — isolation flags and
//! asset reachability — and reports the diagnosis without constructing
//! an engine. Useful for verifying a deployment before shipping it.
//!
//! Configuration (environment / `.env`):
//! - `DOCBRIDGE_ASSET_BASE_URL` — base URL of the engine assets.
//! - `DOCBRIDGE_CROSS_ORIGIN_ISOLATED` — host isolation flag (default true).
//! - `DOCBRIDGE_SHARED_MEMORY` — shared-memory availability (default true).

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docbridge_engine::environment::{check_environment, StaticHost};
use docbridge_engine::factory::DEFAULT_BASE_URL;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docbridge_preflight=info,docbridge_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_url = std::env::var("DOCBRIDGE_ASSET_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let host = StaticHost {
        cross_origin_isolated: env_flag("DOCBRIDGE_CROSS_ORIGIN_ISOLATED", true),
        shared_memory: env_flag("DOCBRIDGE_SHARED_MEMORY", true),
    };

    tracing::info!(%base_url, "Running conversion engine preflight");

    match check_environment(&host, &reqwest::Client::new(), &base_url).await {
        Ok(total_bytes) => {
            tracing::info!(
                total_bytes,
                total_mb = total_bytes as f64 / 1_048_576.0,
                "Preflight passed: all engine assets reachable",
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Preflight failed");
            ExitCode::FAILURE
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
        Err(_) => default,
    }
}
