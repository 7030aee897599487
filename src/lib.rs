//! pingsweep - Concurrent Reachability Sweep
//!
//! Probes a list of network targets with a bounded pool of concurrent
//! workers and exposes the results both as a console stream and as a live
//! JSON snapshot while the sweep is still running.
//!
//! # Architecture
//!
//! - **Targets**: Ordered target list from a file, arguments, or a generated set
//! - **Probe**: Pluggable reachability capability (ICMP echo by default)
//! - **Sweep**: Dispatcher, worker pool, completion tracker and aggregator
//! - **Store**: Mutex-guarded, append-only result store with snapshots
//! - **Server**: Axum API serving `GET /results`
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pingsweep::{IcmpProber, Sweep, SweepConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let targets = vec!["1.1.1.1".to_string(), "9.9.9.9".to_string()];
//!     let sweep = Sweep::new(Arc::new(IcmpProber::new()), SweepConfig::default(), targets)?
//!         .with_console(true);
//!     let summary = sweep.run().await;
//!     println!("{} of {} reachable", summary.reachable, summary.total);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod probe;
pub mod server;
pub mod store;
pub mod sweep;
pub mod targets;

pub use probe::{IcmpProber, ProbeError, Prober};
pub use store::{ProbeResult, ResultStore, Snapshot, SweepPhase};
pub use sweep::{Sweep, SweepConfig, SweepSummary};
pub use targets::{EmptyPolicy, TargetError};
