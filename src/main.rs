use anyhow::Result;
use batch_load::{app, Cli, HttpRequester};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!("════════════════════════════════════════════════════════════");
    info!("                 BATCH LOAD TEST");
    info!("════════════════════════════════════════════════════════════");

    let requester = Arc::new(HttpRequester::default());
    let mut stdout = std::io::stdout().lock();

    app::execute(cli, requester, &mut stdout).await
}
