use async_trait::async_trait;
use std::io;
use std::net::Ipv4Addr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{self, Instant};

/// TCP connect seam used by the port prober and the latency sampler.
#[async_trait]
pub trait Dial: Send + Sync {
    /// Establish a connection to `host:port` and close it again.
    async fn dial(&self, host: &str, port: u16) -> io::Result<()>;
}

/// Plain TCP connect via `tokio::net::TcpStream`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpDialer;

#[async_trait]
impl Dial for TcpDialer {
    async fn dial(&self, host: &str, port: u16) -> io::Result<()> {
        let stream = TcpStream::connect((host, port)).await?;
        drop(stream);
        Ok(())
    }
}

/// One bounded connect attempt to `host:port`.
///
/// Refused, unreachable, timed out and unparsable ports all report `false`.
pub async fn is_port_open<D>(dialer: &D, host: &str, port: &str, timeout: Duration) -> bool
where
    D: Dial + ?Sized,
{
    let Ok(port) = port.trim().parse::<u16>() else {
        return false;
    };
    matches!(time::timeout(timeout, dialer.dial(host, port)).await, Ok(Ok(())))
}

/// Sequentially connect `samples` times to `ip:port` and average the successful round trips.
///
/// Returns 0 when no attempt succeeds.
pub async fn measure_latency<D>(
    dialer: &D,
    ip: Ipv4Addr,
    port: u16,
    samples: u32,
    timeout: Duration,
) -> f64
where
    D: Dial + ?Sized,
{
    let host = ip.to_string();
    let mut rtts = Vec::with_capacity(samples as usize);
    for _ in 0..samples {
        let start = Instant::now();
        if let Ok(Ok(())) = time::timeout(timeout, dialer.dial(&host, port)).await {
            rtts.push(start.elapsed());
        }
    }
    average_millis(&rtts)
}

/// Mean of the given round-trip times in milliseconds, 0 for an empty slice.
pub fn average_millis(rtts: &[Duration]) -> f64 {
    if rtts.is_empty() {
        return 0.0;
    }
    let total: Duration = rtts.iter().sum();
    total.as_secs_f64() * 1_000.0 / rtts.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::net::TcpListener;

    /// Fails every attempt except the ones listed.
    struct Flaky {
        attempt: AtomicU32,
        succeed_on: Vec<u32>,
    }

    #[async_trait]
    impl Dial for Flaky {
        async fn dial(&self, _host: &str, _port: u16) -> io::Result<()> {
            let n = self.attempt.fetch_add(1, Ordering::SeqCst);
            if self.succeed_on.contains(&n) {
                Ok(())
            } else {
                Err(io::ErrorKind::ConnectionRefused.into())
            }
        }
    }

    struct Hang;

    #[async_trait]
    impl Dial for Hang {
        async fn dial(&self, _host: &str, _port: u16) -> io::Result<()> {
            std::future::pending().await
        }
    }

    #[test]
    fn average_of_nothing_is_zero() {
        assert_eq!(average_millis(&[]), 0.0);
    }

    #[test]
    fn average_counts_only_given_samples() {
        let rtts = [Duration::from_millis(10), Duration::from_millis(30)];
        assert!((average_millis(&rtts) - 20.0).abs() < 1e-9);
    }

    /// First attempt connects after a delay, every later attempt is refused at once.
    struct SlowThenRefuse {
        attempt: AtomicU32,
        delay: Duration,
    }

    #[async_trait]
    impl Dial for SlowThenRefuse {
        async fn dial(&self, _host: &str, _port: u16) -> io::Result<()> {
            if self.attempt.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(self.delay).await;
                Ok(())
            } else {
                Err(io::ErrorKind::ConnectionRefused.into())
            }
        }
    }

    fn flaky(succeed_on: Vec<u32>) -> Flaky {
        Flaky {
            attempt: AtomicU32::new(0),
            succeed_on,
        }
    }

    #[tokio::test]
    async fn all_failed_samples_give_zero() {
        let d = flaky(vec![]);
        let timeout = Duration::from_millis(50);
        let avg = measure_latency(&d, Ipv4Addr::LOCALHOST, 80, 3, timeout).await;
        assert_eq!(avg, 0.0);
        assert_eq!(d.attempt.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn mean_covers_only_successful_attempts() {
        let d = SlowThenRefuse {
            attempt: AtomicU32::new(0),
            delay: Duration::from_millis(40),
        };
        let timeout = Duration::from_secs(1);
        let avg = measure_latency(&d, Ipv4Addr::LOCALHOST, 80, 2, timeout).await;
        // Averaging over both attempts would give roughly 20ms.
        assert!(avg >= 39.0, "avg was {avg}");
        assert_eq!(d.attempt.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn hanging_connect_is_closed() {
        assert!(!is_port_open(&Hang, "10.0.0.1", "80", Duration::from_millis(20)).await);
    }

    #[tokio::test]
    async fn bad_port_is_closed() {
        let d = flaky(vec![0]);
        assert!(!is_port_open(&d, "localhost", "http", Duration::from_millis(50)).await);
        assert!(!is_port_open(&d, "localhost", "70000", Duration::from_millis(50)).await);
        assert_eq!(d.attempt.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn real_listener_is_open() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port().to_string();
        assert!(is_port_open(&TcpDialer, "127.0.0.1", &port, Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn latency_against_real_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let timeout = Duration::from_secs(1);
        let avg = measure_latency(&TcpDialer, Ipv4Addr::LOCALHOST, port, 2, timeout).await;
        assert!(avg > 0.0);
    }
}
