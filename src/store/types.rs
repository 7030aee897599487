//! Core data types for the result store.

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumString};

/// Outcome of probing a single target.
///
/// Serialized as `{ "ip", "reachable", "latency_ms", "error"? }`. The input
/// index is kept for [`Snapshot::sorted_by_target`] but never serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    /// Position of the target in the input sequence.
    #[serde(skip)]
    pub index: usize,
    /// Target identifier as given (address or hostname).
    #[serde(rename = "ip")]
    pub target: String,
    /// Whether at least one echo reply arrived.
    pub reachable: bool,
    /// Average round-trip time; only set when reachable.
    #[serde(rename = "latency_ms", serialize_with = "serialize_latency_ms")]
    pub latency: Option<Duration>,
    /// Why the probe failed; only set when unreachable.
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl ProbeResult {
    /// Result for a target that answered.
    pub fn reachable(index: usize, target: impl Into<String>, latency: Duration) -> Self {
        Self {
            index,
            target: target.into(),
            reachable: true,
            latency: Some(latency),
            failure_reason: None,
        }
    }

    /// Result for a target that did not answer or could not be probed.
    pub fn unreachable(index: usize, target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            index,
            target: target.into(),
            reachable: false,
            latency: None,
            failure_reason: Some(reason.into()),
        }
    }

    /// Latency in fractional milliseconds, `0.0` when unreachable.
    pub fn latency_ms(&self) -> f64 {
        self.latency.map_or(0.0, duration_ms)
    }
}

fn serialize_latency_ms<S: Serializer>(
    latency: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(latency.map_or(0.0, duration_ms))
}

fn duration_ms(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

/// Console line format: `<target> reachable in <latency>` or
/// `<target> unreachable: <reason>`.
impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reachable {
            write!(f, "{} reachable in {:.2}ms", self.target, self.latency_ms())
        } else {
            write!(
                f,
                "{} unreachable: {}",
                self.target,
                self.failure_reason.as_deref().unwrap_or("unknown")
            )
        }
    }
}

/// Lifecycle of a sweep.
///
/// Phases only move forward: `NotStarted -> Dispatching -> Draining -> Complete`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    EnumString,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SweepPhase {
    /// Store exists, no target dispatched yet.
    #[default]
    NotStarted,
    /// Targets are being fed to workers.
    Dispatching,
    /// Every target dispatched, workers finishing in-flight probes.
    Draining,
    /// Results channel closed, every result collected.
    Complete,
}

/// Immutable point-in-time copy of the result store.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Number of targets the sweep was started with.
    pub total_targets: usize,
    /// Number of results collected so far.
    pub processed: usize,
    /// Sweep phase at the moment the snapshot was taken.
    pub state: SweepPhase,
    /// Results in arrival order (completion order, not input order).
    pub results: Vec<ProbeResult>,
}

impl Snapshot {
    /// Re-sort results by their target's position in the input sequence.
    ///
    /// Arrival order depends on probe completion times; this is the explicit
    /// post-processing step for consumers that need input order.
    pub fn sorted_by_target(mut self) -> Self {
        self.results.sort_by_key(|r| r.index);
        self
    }

    /// Number of reachable results in this snapshot.
    pub fn reachable(&self) -> usize {
        self.results.iter().filter(|r| r.reachable).count()
    }

    /// Number of unreachable results in this snapshot.
    pub fn unreachable(&self) -> usize {
        self.processed - self.reachable()
    }
}
