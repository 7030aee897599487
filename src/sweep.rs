//! Sweep Engine
//!
//! Probes a finite list of targets with a fixed-size pool of tokio tasks and
//! collects one result per target into a [`ResultStore`].
//!
//! # Architecture
//!
//! ```text
//! targets -> dispatcher -> job queue -> W workers -> results channel -> aggregator -> store
//!                                           |
//!                              completion tracker (closes results channel)
//! ```
//!
//! - The job queue and results channel are capacity-1 `mpsc` channels, so
//!   the dispatcher runs at the pace of the pool.
//! - Results are stored in completion order, not input order. Use
//!   [`Snapshot::sorted_by_target`](crate::store::Snapshot::sorted_by_target)
//!   when input order matters.
//! - Probe failures never abort the sweep; they become unreachable results.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pingsweep::{IcmpProber, Sweep, SweepConfig};
//!
//! # async fn run() -> Result<(), pingsweep::config::ConfigError> {
//! let targets = vec!["1.1.1.1".to_string(), "8.8.8.8".to_string()];
//! let sweep = Sweep::new(Arc::new(IcmpProber::new()), SweepConfig::default(), targets)?;
//! let store = sweep.store();
//! let summary = sweep.run().await;
//! assert_eq!(summary.total, store.processed());
//! # Ok(())
//! # }
//! ```

mod aggregator;
mod dispatcher;
mod tracker;
mod worker;

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;

use crate::config::ConfigError;
use crate::probe::Prober;
use crate::store::{ResultStore, SweepPhase};

use aggregator::Aggregator;
use tracker::CompletionTracker;
use worker::Worker;

pub use dispatcher::Job;
pub use worker::WorkerStats;

/// Default worker pool size.
pub const DEFAULT_WORKERS: usize = 100;

/// Default per-target probe timeout (1 second).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Default echo requests per target.
pub const DEFAULT_COUNT: u32 = 1;

/// Buffer of the job queue and the results channel. Kept at one slot so a
/// send is effectively a hand-off to a ready consumer.
const HANDOFF_CAPACITY: usize = 1;

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_count() -> u32 {
    DEFAULT_COUNT
}

/// Sweep tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Maximum number of probes in flight (default: 100).
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Per-target probe timeout (default: 1s).
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
    /// Echo requests per target (default: 1).
    #[serde(default = "default_count")]
    pub count: u32,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            timeout: DEFAULT_TIMEOUT,
            count: DEFAULT_COUNT,
        }
    }
}

impl SweepConfig {
    /// Set the worker pool size.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the per-target timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the echo count.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` if any field is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::ValidationError(
                "sweep workers must be positive".to_string(),
            ));
        }
        if self.count == 0 {
            return Err(ConfigError::ValidationError(
                "sweep count must be positive".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "sweep timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome counts of a finished sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepSummary {
    /// Results collected; equals the number of targets once the sweep completes.
    pub total: usize,

    /// Targets that answered at least one echo request.
    pub reachable: usize,

    /// Targets that failed to resolve, timed out or errored.
    pub unreachable: usize,

    /// Wall-clock time from start of dispatch to the last stored result.
    pub elapsed: Duration,
}

/// One sweep over a fixed target list.
pub struct Sweep {
    prober: Arc<dyn Prober>,
    config: SweepConfig,
    targets: Vec<String>,
    store: ResultStore,
    console: bool,
}

impl Sweep {
    /// Prepare a sweep. Nothing runs until [`Sweep::run`].
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` if `config` would leave targets
    /// unprocessed (zero workers or count) or could never succeed (zero timeout).
    pub fn new(
        prober: Arc<dyn Prober>,
        config: SweepConfig,
        targets: Vec<String>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let store = ResultStore::new(targets.len());
        Ok(Self {
            prober,
            config,
            targets,
            store,
            console: false,
        })
    }

    /// Print one line per result to stdout as results arrive.
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Handle to this sweep's result store, readable before, during and after the run.
    pub fn store(&self) -> ResultStore {
        self.store.clone()
    }

    /// Run every target to completion.
    ///
    /// Returns once the results channel is closed and every result is in the store.
    pub async fn run(self) -> SweepSummary {
        let started = Instant::now();
        let total = self.targets.len();
        // Never spawn more workers than there are jobs.
        let pool_size = self.config.workers.min(total);

        tracing::info!(
            targets = total,
            workers = pool_size,
            timeout = ?self.config.timeout,
            count = self.config.count,
            "Sweep started"
        );
        self.store.advance(SweepPhase::Dispatching);

        let (job_tx, job_rx) = mpsc::channel(HANDOFF_CAPACITY);
        let (result_tx, result_rx) = mpsc::channel(HANDOFF_CAPACITY);
        let jobs = Arc::new(Mutex::new(job_rx));

        let mut workers = JoinSet::new();
        for id in 0..pool_size {
            let worker = Worker::new(
                id,
                Arc::clone(&self.prober),
                self.config.count,
                self.config.timeout,
            );
            workers.spawn(worker.run(Arc::clone(&jobs), result_tx.clone()));
        }
        drop(jobs);

        let dispatcher = tokio::spawn(dispatcher::dispatch(
            self.targets,
            job_tx,
            self.store.clone(),
        ));
        let tracker = tokio::spawn(CompletionTracker::new(workers, result_tx).wait());

        let collected = Aggregator::new(self.store.clone(), self.console)
            .run(result_rx)
            .await;

        match dispatcher.await {
            Ok(sent) if sent < total => {
                tracing::error!(sent, total, "Sweep ended with undispatched targets");
            }
            Ok(_) => {}
            Err(e) => tracing::error!(error = %e, "Dispatcher task failed"),
        }
        if let Err(e) = tracker.await {
            tracing::error!(error = %e, "Completion tracker task failed");
        }

        let snapshot = self.store.snapshot();
        let summary = SweepSummary {
            total: collected,
            reachable: snapshot.reachable(),
            unreachable: snapshot.unreachable(),
            elapsed: started.elapsed(),
        };

        tracing::info!(
            processed = summary.total,
            reachable = summary.reachable,
            unreachable = summary.unreachable,
            elapsed = ?summary.elapsed,
            "Sweep complete"
        );
        summary
    }
}

impl std::fmt::Debug for Sweep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sweep")
            .field("config", &self.config)
            .field("targets", &self.targets.len())
            .field("console", &self.console)
            .finish_non_exhaustive()
    }
}
