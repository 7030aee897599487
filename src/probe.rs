//! Probe Layer
//!
//! The capability that turns a single target into a reachability verdict.
//! The sweep engine only depends on the [`Prober`] trait, so the real ICMP
//! implementation can be swapped for a stub in tests.
//!
//! - [`Prober`]: Core trait for probing one target
//! - [`ProbeError`]: Per-target failure reasons (never fatal to a sweep)
//! - [`IcmpProber`]: ICMP echo implementation backed by `surge-ping`

mod icmp;
mod traits;

pub use icmp::IcmpProber;
pub use traits::{ProbeError, Prober};
