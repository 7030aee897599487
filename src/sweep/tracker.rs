//! Completion tracker: closes the results channel once every worker has exited.

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use super::worker::WorkerStats;
use crate::store::ProbeResult;

/// Waits for the whole worker pool, then closes the results channel.
///
/// Workers hold clones of the results sender and the tracker holds the
/// sender they were cloned from. The channel only closes when the tracker
/// drops it, after the last worker has been joined, so no in-flight probe
/// can lose its result.
pub(crate) struct CompletionTracker {
    workers: JoinSet<WorkerStats>,
    results: mpsc::Sender<ProbeResult>,
}

impl CompletionTracker {
    pub(crate) fn new(workers: JoinSet<WorkerStats>, results: mpsc::Sender<ProbeResult>) -> Self {
        Self { workers, results }
    }

    /// Join every worker, then close the results channel.
    ///
    /// Returns the stats of workers that exited normally.
    pub(crate) async fn wait(mut self) -> Vec<WorkerStats> {
        let mut finished = Vec::with_capacity(self.workers.len());

        while let Some(joined) = self.workers.join_next().await {
            match joined {
                Ok(stats) => {
                    tracing::trace!(worker = stats.id, probes = stats.probes, "Worker exited");
                    finished.push(stats);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Worker task failed");
                }
            }
        }

        drop(self.results);
        tracing::debug!(workers = finished.len(), "Worker pool drained, results channel closed");
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_channel_closes_only_after_all_workers() {
        let (tx, mut rx) = mpsc::channel::<ProbeResult>(4);
        let mut workers = JoinSet::new();

        for id in 0..3 {
            let tx = tx.clone();
            workers.spawn(async move {
                tokio::time::sleep(Duration::from_millis(10 * (id as u64 + 1))).await;
                tx.send(ProbeResult::unreachable(id, format!("t{id}"), "timeout"))
                    .await
                    .unwrap();
                WorkerStats { id, probes: 1 }
            });
        }

        let tracker = tokio::spawn(CompletionTracker::new(workers, tx).wait());

        let mut received = 0;
        while rx.recv().await.is_some() {
            received += 1;
        }
        assert_eq!(received, 3);

        let mut stats = tracker.await.unwrap();
        stats.sort_by_key(|s| s.id);
        assert_eq!(stats.len(), 3);
        assert!(stats.iter().all(|s| s.probes == 1));
    }

    #[tokio::test]
    async fn test_empty_pool_closes_immediately() {
        let (tx, mut rx) = mpsc::channel::<ProbeResult>(1);
        let stats = CompletionTracker::new(JoinSet::new(), tx).wait().await;

        assert!(stats.is_empty());
        assert!(rx.recv().await.is_none());
    }

    async fn exploding_worker() -> WorkerStats {
        panic!("worker blew up")
    }

    #[tokio::test]
    async fn test_panicked_worker_does_not_block_completion() {
        let (tx, mut rx) = mpsc::channel::<ProbeResult>(1);
        let mut workers = JoinSet::new();
        workers.spawn(exploding_worker());
        workers.spawn(async { WorkerStats { id: 1, probes: 0 } });

        let stats = CompletionTracker::new(workers, tx).wait().await;
        assert_eq!(stats, vec![WorkerStats { id: 1, probes: 0 }]);
        assert!(rx.recv().await.is_none());
    }
}
