use hdrhistogram::Histogram;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::Duration;
use tracing::{info, warn};

// =============================================================================
// Report
// =============================================================================

/// Result of one run: timing, responses by status code, and per-request
/// latency in microseconds.
#[derive(Debug, Clone)]
pub struct Report {
    pub elapsed: Duration,
    pub total_requests: usize,
    pub statuses: BTreeMap<u16, u64>,
    pub failed: u64,
    pub latency: Histogram<u64>,
}

impl Report {
    /// Elapsed time divided by the number of requests; `None` for an empty run.
    #[must_use]
    pub fn mean(&self) -> Option<Duration> {
        if self.total_requests == 0 {
            return None;
        }
        let nanos = self.elapsed.as_nanos() / self.total_requests as u128;
        Some(Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)))
    }

    /// Number of requests that got a response, whatever its status.
    #[must_use]
    pub fn responses(&self) -> u64 {
        self.statuses.values().sum()
    }

    /// Writes the human readable summary.
    ///
    /// # Errors
    ///
    /// Propagates failures from the underlying writer.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Total time for all requests: {:?}", self.elapsed)?;
        match self.mean() {
            Some(mean) => writeln!(out, "Mean time for all requests: {:?}", mean)?,
            None => writeln!(out, "Mean time for all requests: n/a")?,
        }
        writeln!(out, "Number of responses by HTTP code:")?;
        for (code, count) in &self.statuses {
            writeln!(out, "HTTP {}: {}", code, count)?;
        }
        Ok(())
    }

    pub fn log_latency_summary(&self) {
        if self.failed > 0 {
            warn!("Failed requests: {}", self.failed);
        }

        info!("Request Latency (us):");
        if self.latency.len() > 0 {
            info!("  Min:    {}", self.latency.min());
            info!("  Mean:   {:.2}", self.latency.mean());
            info!("  p50:    {}", self.latency.value_at_quantile(0.50));
            info!("  p95:    {}", self.latency.value_at_quantile(0.95));
            info!("  p99:    {}", self.latency.value_at_quantile(0.99));
            info!("  Max:    {}", self.latency.max());
        } else {
            info!("  No data");
        }
    }
}
