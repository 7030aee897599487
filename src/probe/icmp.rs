//! ICMP echo prober.
//!
//! Measures average ICMP round-trip time to a target host.

use std::net::IpAddr;
use std::time::Duration;

use surge_ping::{Client, Config, ICMP, PingIdentifier, PingSequence, SurgeError};
use tokio::sync::OnceCell;
use tokio::time::Instant;

use super::{ProbeError, Prober};

/// Echo payload size in bytes (same as the classic `ping` default).
const PAYLOAD: [u8; 56] = [0; 56];

/// ICMP echo prober.
///
/// One client per address family is created on first use and shared by
/// every concurrent probe; each probe gets its own random identifier so
/// replies are routed back to the right caller.
#[derive(Default)]
pub struct IcmpProber {
    v4: OnceCell<Client>,
    v6: OnceCell<Client>,
}

impl IcmpProber {
    /// Create a prober. Sockets are opened lazily on the first probe.
    pub fn new() -> Self {
        Self::default()
    }

    async fn client_for(&self, ip: IpAddr) -> Result<&Client, ProbeError> {
        let (cell, config) = match ip {
            IpAddr::V4(_) => (&self.v4, Config::default()),
            IpAddr::V6(_) => (&self.v6, Config::builder().kind(ICMP::V6).build()),
        };
        cell.get_or_try_init(|| async move { Client::new(&config) })
            .await
            .map_err(ProbeError::Client)
    }
}

impl std::fmt::Debug for IcmpProber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IcmpProber")
            .field("v4_ready", &self.v4.initialized())
            .field("v6_ready", &self.v6.initialized())
            .finish()
    }
}

/// Resolve hostname to IP address.
async fn resolve_host(host: &str) -> Result<IpAddr, std::io::Error> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    let addrs = tokio::net::lookup_host(format!("{host}:0")).await?;
    addrs
        .into_iter()
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses found"))
}

#[async_trait::async_trait]
impl Prober for IcmpProber {
    async fn probe(
        &self,
        target: &str,
        count: u32,
        timeout: Duration,
    ) -> Result<Duration, ProbeError> {
        // The timeout covers the whole probe, name resolution included.
        let deadline = Instant::now() + timeout;

        let ip = match tokio::time::timeout_at(deadline, resolve_host(target)).await {
            Ok(resolved) => resolved.map_err(|source| ProbeError::Resolve {
                target: target.to_string(),
                source,
            })?,
            Err(_) => {
                tracing::trace!(host = %target, "Name resolution timed out");
                return Err(ProbeError::Timeout);
            }
        };

        let client = self.client_for(ip).await?;
        let mut pinger = client.pinger(ip, PingIdentifier(rand::random())).await;

        let mut received: u32 = 0;
        let mut total = Duration::ZERO;

        // ICMP sequence numbers are 16 bits; long runs cycle back to 0.
        let sequences = (0..=u16::MAX).cycle().zip(0..count);
        for (seq, _) in sequences {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            pinger.timeout(remaining);

            match pinger.ping(PingSequence(seq), &PAYLOAD).await {
                Ok((_, rtt)) => {
                    received += 1;
                    total += rtt;
                }
                Err(SurgeError::Timeout { .. }) => {
                    tracing::trace!(host = %target, seq, "Echo request timed out");
                }
                Err(e) => return Err(ProbeError::Transport(e.to_string())),
            }
        }

        if received == 0 {
            return Err(ProbeError::Timeout);
        }

        Ok(total / received)
    }
}
