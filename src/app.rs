use crate::config::{Cli, ConfigError};
use crate::executor::BatchExecutor;
use crate::requester::Requester;
use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;
use tracing::info;

/// Validates the flags and runs the load test, writing everything meant for
/// the user to `out`.
///
/// A missing URL is a usage notice rather than an error: the message is
/// written and no request is made.
///
/// # Errors
///
/// Fails only when `out` cannot be written to.
pub async fn execute<W: Write>(cli: Cli, requester: Arc<dyn Requester>, out: &mut W) -> Result<()> {
    let config = match cli.into_run_config() {
        Ok(config) => config,
        Err(e @ ConfigError::MissingUrl) => {
            writeln!(out, "{}", e).context("Failed to write usage notice")?;
            return Ok(());
        }
    };

    info!("Target: {}", config.url);
    info!("Requests: {}", config.total_requests);
    info!("Concurrency: {}", config.concurrency);

    let report = BatchExecutor::new(config, requester)
        .run(out)
        .await
        .context("Load test run failed")?;

    report.log_latency_summary();
    out.flush().context("Failed to flush output")?;

    Ok(())
}
