mod cli;
mod config;
mod errors;
mod match_client;
mod models;
mod session;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::match_client::{HttpMatchClient, MatchBackend};
use crate::session::{SessionState, Threshold};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr so the console output on stdout stays readable.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting matcher v{}", env!("CARGO_PKG_VERSION"));

    let client = HttpMatchClient::new(config.api_url.clone(), config.timeout)?;
    info!(
        "Matching backend: {} (timeout: {})",
        client.base_url(),
        config
            .timeout
            .map(|t| format!("{}s", t.as_secs()))
            .unwrap_or_else(|| "none".to_string())
    );
    let backend: Arc<dyn MatchBackend> = Arc::new(client);

    let session = SessionState::new(Threshold::new(config.threshold.clone()));
    cli::run(session, backend).await
}
