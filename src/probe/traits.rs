//! Core probe trait and error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while probing a single target.
///
/// Every variant is local to one target: the sweep records it as an
/// unreachable result and moves on.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Target could not be parsed or resolved to an address.
    #[error("cannot resolve {target}: {source}")]
    Resolve {
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// ICMP client could not be created (socket permissions, unsupported family).
    #[error("client error: {0}")]
    Client(std::io::Error),

    /// Echo exchange failed at the transport level.
    #[error("transport error: {0}")]
    Transport(String),

    /// No echo reply arrived within the timeout.
    #[error("timeout")]
    Timeout,
}

/// Capability that probes one target for reachability.
///
/// # Contract
///
/// - `count` is the number of echo requests to send (at least 1).
/// - `timeout` bounds the whole probe, name resolution included, not each echo.
/// - `Ok(latency)` means at least one reply arrived; `latency` is the
///   average round-trip time of the replies that did.
/// - Zero replies within the timeout is reported as [`ProbeError::Timeout`].
///
/// Implementations must not retry on their own beyond the `count` echoes.
#[async_trait::async_trait]
pub trait Prober: Send + Sync + 'static {
    /// Probe `target` and return its average round-trip time.
    async fn probe(
        &self,
        target: &str,
        count: u32,
        timeout: Duration,
    ) -> Result<Duration, ProbeError>;
}
