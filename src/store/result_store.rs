//! Mutex-guarded, append-only result store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::types::{ProbeResult, Snapshot, SweepPhase};

/// Shared result store for one sweep.
///
/// Cheap to clone; every clone points at the same state. Results are only
/// appended from inside the crate (by the sweep aggregator); everyone else
/// reads through [`ResultStore::snapshot`]. The backing list is never
/// exposed and never shrinks.
#[derive(Clone)]
pub struct ResultStore {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    total_targets: usize,
    phase: SweepPhase,
    results: Vec<ProbeResult>,
}

impl ResultStore {
    /// Create an empty store expecting `total_targets` results.
    pub fn new(total_targets: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                total_targets,
                phase: SweepPhase::NotStarted,
                results: Vec::with_capacity(total_targets),
            })),
        }
    }

    // A panic while holding the lock cannot leave the list half-written
    // (push is the only mutation), so poisoned state is still consistent.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append one result.
    pub(crate) fn append(&self, result: ProbeResult) {
        let mut inner = self.lock();
        debug_assert!(
            inner.results.len() < inner.total_targets,
            "more results than targets"
        );
        inner.results.push(result);
    }

    /// Move the sweep to `phase`. Backward transitions are ignored.
    pub(crate) fn advance(&self, phase: SweepPhase) {
        let mut inner = self.lock();
        if phase > inner.phase {
            tracing::debug!(from = %inner.phase, to = %phase, "Sweep phase changed");
            inner.phase = phase;
        }
    }

    /// Number of targets the sweep was started with.
    pub fn total_targets(&self) -> usize {
        self.lock().total_targets
    }

    /// Number of results collected so far.
    pub fn processed(&self) -> usize {
        self.lock().results.len()
    }

    /// Current sweep phase.
    pub fn phase(&self) -> SweepPhase {
        self.lock().phase
    }

    /// Copy the current state out under the lock.
    pub fn snapshot(&self) -> Snapshot {
        let inner = self.lock();
        Snapshot {
            total_targets: inner.total_targets,
            processed: inner.results.len(),
            state: inner.phase,
            results: inner.results.clone(),
        }
    }
}

impl std::fmt::Debug for ResultStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("ResultStore")
            .field("total_targets", &inner.total_targets)
            .field("processed", &inner.results.len())
            .field("phase", &inner.phase)
            .finish_non_exhaustive()
    }
}
