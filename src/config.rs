use clap::Parser;
use std::num::NonZeroUsize;
use thiserror::Error;

// =============================================================================
// Command Line
// =============================================================================

#[derive(Parser, Debug, Clone)]
#[command(name = "batch-load", version)]
#[command(about = "Fire batches of concurrent GET requests at a URL", long_about = None)]
pub struct Cli {
    /// URL to request
    #[arg(short = 'u', default_value = "")]
    pub url: String,

    /// Number of requests to make
    #[arg(short = 'n', default_value_t = 1)]
    pub requests: usize,

    /// Concurrency
    #[arg(short = 'c', default_value_t = NonZeroUsize::MIN)]
    pub concurrency: NonZeroUsize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Please provide a URL with the -u flag.")]
    MissingUrl,
}

// =============================================================================
// Run Configuration
// =============================================================================

/// Validated parameters for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub url: String,
    pub total_requests: usize,
    pub concurrency: NonZeroUsize,
}

impl Cli {
    /// Validates the parsed flags.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingUrl`] when no target URL was given.
    pub fn into_run_config(self) -> Result<RunConfig, ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::MissingUrl);
        }

        Ok(RunConfig {
            url: self.url,
            total_requests: self.requests,
            concurrency: self.concurrency,
        })
    }
}
