use crate::config::RunConfig;
use crate::report::Report;
use crate::requester::{RequestError, Requester};
use crate::signal::{StartSignal, StartWaiter};
use futures_util::future::join_all;
use hdrhistogram::Histogram;
use reqwest::StatusCode;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to write run output: {source}")]
    Output {
        #[from]
        source: io::Error,
    },
    #[error("Failed to create latency histogram: {source}")]
    Histogram {
        #[from]
        source: hdrhistogram::CreationError,
    },
}

// =============================================================================
// Batch Plan
// =============================================================================

/// Splits `total` requests into consecutive batches of at most `concurrency`.
#[derive(Debug, Clone)]
pub struct Batches {
    remaining: usize,
    concurrency: usize,
}

impl Batches {
    #[must_use]
    pub fn new(total: usize, concurrency: std::num::NonZeroUsize) -> Self {
        Self {
            remaining: total,
            concurrency: concurrency.get(),
        }
    }
}

impl Iterator for Batches {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let size = self.concurrency.min(self.remaining);
        self.remaining -= size;
        Some(size)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let batches = self.remaining.div_ceil(self.concurrency);
        (batches, Some(batches))
    }
}

impl ExactSizeIterator for Batches {}

// =============================================================================
// Executor
// =============================================================================

#[derive(Debug)]
struct Outcome {
    result: Result<StatusCode, RequestError>,
    latency: Duration,
}

/// Runs the configured number of requests in barrier separated batches.
///
/// The executor is the only owner of the per-status counts. Request tasks
/// hand their outcome back over a channel, so nothing is shared between
/// tasks except the start signal of their batch.
pub struct BatchExecutor {
    config: RunConfig,
    requester: Arc<dyn Requester>,
}

impl BatchExecutor {
    #[must_use]
    pub fn new(config: RunConfig, requester: Arc<dyn Requester>) -> Self {
        Self { config, requester }
    }

    /// Executes every batch, writing progress and per-request errors to
    /// `out`, followed by the final report.
    ///
    /// Error lines for a batch are written together once the batch has
    /// finished, just before its `Finished` line. Request failures never
    /// abort the run.
    ///
    /// # Errors
    ///
    /// Returns an error if `out` cannot be written to.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<Report, RunError> {
        let total = self.config.total_requests;
        let url: Arc<str> = Arc::from(self.config.url.as_str());

        let mut statuses: BTreeMap<u16, u64> = BTreeMap::new();
        let mut latency = Histogram::<u64>::new(3)?;
        let mut failed = 0u64;
        let mut completed = 0usize;

        let batches = Batches::new(total, self.config.concurrency);
        info!(
            "Running {} requests against {} in {} batches",
            total,
            url,
            batches.len()
        );

        let start = Instant::now();

        for (index, size) in batches.enumerate() {
            let (tx, mut rx) = mpsc::unbounded_channel::<Outcome>();
            let signal = StartSignal::new();

            let tasks: Vec<_> = (0..size)
                .map(|_| {
                    tokio::spawn(issue_request(
                        signal.subscribe(),
                        Arc::clone(&self.requester),
                        Arc::clone(&url),
                        tx.clone(),
                    ))
                })
                .collect();
            drop(tx);

            let released = signal.release();
            debug!("Batch {} released {} requests", index, released);

            for joined in join_all(tasks).await {
                if let Err(e) = joined {
                    error!("Request task in batch {} failed: {}", index, e);
                    writeln!(out, "Error making request: {}", e)?;
                    failed += 1;
                }
            }

            // Every sender is gone once the batch has joined.
            while let Some(outcome) = rx.recv().await {
                match outcome.result {
                    Ok(status) => {
                        *statuses.entry(status.as_u16()).or_insert(0) += 1;
                        let micros = u64::try_from(outcome.latency.as_micros()).unwrap_or(u64::MAX);
                        latency.saturating_record(micros);
                    }
                    Err(e) if e.is_construction() => {
                        debug!("Batch {} request could not be built: {}", index, e);
                        writeln!(out, "Error creating request: {}", e)?;
                        failed += 1;
                    }
                    Err(e) => {
                        debug!("Batch {} request failed: {}", index, e);
                        writeln!(out, "Error making request: {}", e)?;
                        failed += 1;
                    }
                }
            }

            completed += size;
            writeln!(out, "Finished {} requests", completed)?;
        }

        let report = Report {
            elapsed: start.elapsed(),
            total_requests: total,
            statuses,
            failed,
            latency,
        };
        report.write_to(out)?;

        Ok(report)
    }
}

async fn issue_request(
    waiter: StartWaiter,
    requester: Arc<dyn Requester>,
    url: Arc<str>,
    results: mpsc::UnboundedSender<Outcome>,
) {
    waiter.wait().await;

    let started = Instant::now();
    let result = requester.get(&url).await;
    let outcome = Outcome {
        result,
        latency: started.elapsed(),
    };

    // The executor keeps the receiver alive until the batch has joined.
    let _ = results.send(outcome);
}
