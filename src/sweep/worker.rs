//! Pool worker: takes jobs off the shared queue and probes them one at a time.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};

use super::dispatcher::Job;
use crate::probe::Prober;
use crate::store::ProbeResult;

/// Job queue shared by every worker of a pool.
///
/// The mutex only serializes *receiving*; a job leaves the queue under the
/// lock and is probed after the lock is released.
pub(crate) type JobQueue = Arc<Mutex<mpsc::Receiver<Job>>>;

/// What a worker reports back when it exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    /// Worker number within the pool.
    pub id: usize,
    /// Number of jobs this worker probed.
    pub probes: usize,
}

/// One worker of the pool.
pub(crate) struct Worker {
    id: usize,
    prober: Arc<dyn Prober>,
    count: u32,
    timeout: Duration,
}

impl Worker {
    pub(crate) fn new(id: usize, prober: Arc<dyn Prober>, count: u32, timeout: Duration) -> Self {
        Self {
            id,
            prober,
            count,
            timeout,
        }
    }

    /// Process jobs until the queue is closed and empty.
    ///
    /// Emits exactly one result per job taken, failures included.
    pub(crate) async fn run(
        self,
        jobs: JobQueue,
        results: mpsc::Sender<ProbeResult>,
    ) -> WorkerStats {
        let mut probes = 0;

        loop {
            let job = jobs.lock().await.recv().await;
            let Some(job) = job else {
                break;
            };

            let result = self.probe(job).await;
            probes += 1;

            if results.send(result).await.is_err() {
                tracing::warn!(worker = self.id, "Results channel closed, worker stopping");
                break;
            }
        }

        WorkerStats {
            id: self.id,
            probes,
        }
    }

    async fn probe(&self, job: Job) -> ProbeResult {
        // Run the prober on its own task so a panic costs one result, not the worker.
        let prober = Arc::clone(&self.prober);
        let target = job.target.clone();
        let (count, timeout) = (self.count, self.timeout);
        let outcome =
            tokio::spawn(async move { prober.probe(&target, count, timeout).await }).await;

        match outcome {
            Ok(Ok(latency)) => {
                tracing::trace!(
                    worker = self.id,
                    host = %job.target,
                    latency_ms = latency.as_secs_f64() * 1000.0,
                    "Probe succeeded"
                );
                ProbeResult::reachable(job.index, job.target, latency)
            }
            Ok(Err(e)) => {
                tracing::trace!(
                    worker = self.id,
                    host = %job.target,
                    error = %e,
                    "Probe failed"
                );
                ProbeResult::unreachable(job.index, job.target, e.to_string())
            }
            Err(e) => {
                let reason = if e.is_panic() { "panic" } else { "cancelled" };
                tracing::error!(
                    worker = self.id,
                    host = %job.target,
                    error = %e,
                    "Probe task aborted"
                );
                ProbeResult::unreachable(job.index, job.target, reason)
            }
        }
    }
}
