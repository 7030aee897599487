//! Result Store
//!
//! The only shared mutable state of a sweep: an append-only list of probe
//! results plus the expected total, guarded by a single mutex.
//!
//! - [`ResultStore`]: Cloneable handle; appended to by the aggregator, read by the API
//! - [`ProbeResult`]: Outcome of probing one target
//! - [`Snapshot`]: Immutable point-in-time copy served to readers
//! - [`SweepPhase`]: Lifecycle of a sweep as observed through snapshots

mod result_store;
mod types;

pub use result_store::ResultStore;
pub use types::{ProbeResult, Snapshot, SweepPhase};
