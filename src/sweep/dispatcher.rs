//! Job dispatcher: feeds targets, in input order, into the shared job queue.

use tokio::sync::mpsc;

use crate::store::{ResultStore, SweepPhase};

/// A single target queued for exactly one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Position of the target in the input sequence.
    pub index: usize,
    /// Target identifier.
    pub target: String,
}

/// Send every target as a [`Job`], then close the queue.
///
/// Each send waits until a worker makes room, so dispatch runs at the pace
/// of the pool. If every worker is gone the remaining targets are abandoned
/// instead of blocking forever. Returns the number of jobs sent.
pub(crate) async fn dispatch(
    targets: Vec<String>,
    jobs: mpsc::Sender<Job>,
    store: ResultStore,
) -> usize {
    let total = targets.len();
    let mut sent = 0;

    for (index, target) in targets.into_iter().enumerate() {
        if jobs.send(Job { index, target }).await.is_err() {
            tracing::error!(
                sent,
                abandoned = total - sent,
                "Job queue closed by workers, stopping dispatch"
            );
            break;
        }
        sent += 1;
    }

    // Dropping the only sender closes the queue; idle workers see `None` and exit.
    drop(jobs);
    store.advance(SweepPhase::Draining);
    tracing::debug!(sent, "All jobs dispatched, queue closed");
    sent
}
