//! Bounded parallel execution of per-filing jobs.
//!
//! Parsing is CPU-bound and independent per filing. Jobs run on tokio's
//! blocking pool with at most `max_workers` in flight; a failing job is
//! logged and counted, never aborting the batch.

use std::fmt::Display;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use edinet_core::{EdinetError, Result};

/// Default number of concurrent workers.
pub const DEFAULT_MAX_WORKERS: usize = 8;

/// Batch execution settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BatchConfig {
    max_workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }
}

impl BatchConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of concurrent workers (at least one).
    #[must_use]
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    /// Number of concurrent workers.
    #[must_use]
    pub const fn max_workers(&self) -> usize {
        self.max_workers
    }
}

/// A job that returned an error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    /// The job, as displayed.
    pub job: String,
    /// The error message.
    pub error: String,
}

/// Outcome of a batch run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchReport<T> {
    /// Jobs that produced an output.
    pub succeeded: usize,
    /// Jobs that completed without an output.
    pub skipped: usize,
    /// Jobs that failed.
    pub failed: Vec<BatchFailure>,
    /// Outputs in completion order.
    pub outputs: Vec<T>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            succeeded: 0,
            skipped: 0,
            failed: Vec::new(),
            outputs: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    /// Total number of jobs processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failed.len()
    }
}

/// Runs `work` over every job on the blocking pool.
///
/// `work` returns `Ok(Some(_))` for an output, `Ok(None)` for a job that
/// legitimately produces nothing, and `Err` for a failure. Outputs arrive in
/// completion order, not job order.
pub async fn run_batch<J, T, F>(jobs: Vec<J>, config: &BatchConfig, work: F) -> BatchReport<T>
where
    J: Display + Send + 'static,
    T: Send + 'static,
    F: Fn(J) -> Result<Option<T>> + Send + Sync + 'static,
{
    let work = Arc::new(work);
    let total = jobs.len();
    debug!(jobs = total, max_workers = config.max_workers, "Starting batch");

    let mut results = stream::iter(jobs)
        .map(|job| {
            let work = Arc::clone(&work);
            let label = job.to_string();
            async move {
                let outcome = tokio::task::spawn_blocking(move || work(job))
                    .await
                    .map_err(|e| EdinetError::Task(e.to_string()))
                    .and_then(|result| result);
                (label, outcome)
            }
        })
        .buffer_unordered(config.max_workers);

    let mut report = BatchReport::default();
    while let Some((job, outcome)) = results.next().await {
        match outcome {
            Ok(Some(output)) => {
                report.succeeded += 1;
                report.outputs.push(output);
            }
            Ok(None) => {
                debug!(job = %job, "Job produced no output");
                report.skipped += 1;
            }
            Err(e) => {
                warn!(job = %job, error = %e, "Job failed");
                report.failed.push(BatchFailure {
                    job,
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        succeeded = report.succeeded,
        skipped = report.skipped,
        failed = report.failed.len(),
        "Batch finished"
    );
    report
}
