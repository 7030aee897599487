//! Result aggregator: the only writer of the result store.

use tokio::sync::mpsc;

use crate::store::{ProbeResult, ResultStore, SweepPhase};

/// Drains the results channel into the store.
pub(crate) struct Aggregator {
    store: ResultStore,
    console: bool,
}

impl Aggregator {
    /// `console` prints one line per result to stdout as it arrives.
    pub(crate) fn new(store: ResultStore, console: bool) -> Self {
        Self { store, console }
    }

    /// Append results in arrival order until the channel is closed and empty,
    /// then mark the sweep complete. Returns the number of results collected.
    pub(crate) async fn run(self, mut results: mpsc::Receiver<ProbeResult>) -> usize {
        let mut collected = 0;

        while let Some(result) = results.recv().await {
            if self.console {
                println!("{result}");
            }
            self.store.append(result);
            collected += 1;
        }

        self.store.advance(SweepPhase::Complete);
        collected
    }
}
