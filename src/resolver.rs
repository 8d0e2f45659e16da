use async_trait::async_trait;
use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tokio::net::lookup_host;
use tokio::time;
use tracing::debug;

/// Name resolution seam used by the scanner.
#[async_trait]
pub trait Resolve: Send + Sync {
    async fn lookup(&self, host: &str) -> io::Result<Vec<IpAddr>>;
}

/// Resolver backed by the operating system via `tokio::net::lookup_host`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

#[async_trait]
impl Resolve for SystemResolver {
    async fn lookup(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        let addrs = lookup_host((host, 0)).await?;
        Ok(addrs.map(|sa| sa.ip()).collect())
    }
}

/// Resolve `host` and return its first IPv4 address.
///
/// Lookup errors, timeouts, empty answers and IPv6-only answers all yield `None`;
/// none of them is fatal to the scan.
pub async fn resolve_ipv4<R>(resolver: &R, host: &str, timeout: Duration) -> Option<Ipv4Addr>
where
    R: Resolve + ?Sized,
{
    match time::timeout(timeout, resolver.lookup(host)).await {
        Ok(Ok(addrs)) => {
            let ip = select_ipv4(&addrs);
            if ip.is_none() {
                debug!(host, answers = addrs.len(), "no usable IPv4 address");
            }
            ip
        }
        Ok(Err(e)) => {
            debug!(host, error = %e, "lookup failed");
            None
        }
        Err(_) => {
            debug!(host, "lookup timed out");
            None
        }
    }
}

/// Pick the first IPv4 address, treating IPv4-mapped IPv6 answers as IPv4.
pub fn select_ipv4(addrs: &[IpAddr]) -> Option<Ipv4Addr> {
    addrs.iter().find_map(|ip| match ip {
        IpAddr::V4(v4) => Some(*v4),
        IpAddr::V6(v6) => v6.to_ipv4_mapped(),
    })
}
