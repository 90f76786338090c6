//! Batched burst load generator for HTTP endpoints.
//!
//! Requests are issued in sequential batches of at most `concurrency`
//! requests. Every request of a batch waits on a shared start signal so the
//! batch hits the target as a burst, and the next batch only begins once the
//! previous one has fully completed.

pub mod app;
pub mod config;
pub mod executor;
pub mod report;
pub mod requester;
pub mod signal;

pub use config::{Cli, ConfigError, RunConfig};
pub use executor::{BatchExecutor, Batches, RunError};
pub use report::Report;
pub use requester::{HttpRequester, RequestError, Requester};
