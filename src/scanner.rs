use crate::config::{ScanConfig, LATENCY_PROBE_PORT};
use crate::error::ConfigError;
use crate::probe::{is_port_open, measure_latency, Dial, TcpDialer};
use crate::progress::{ProgressSink, ProgressTracker};
use crate::resolver::{resolve_ipv4, Resolve, SystemResolver};
use crate::types::{ScanOutcome, ScanResult, ScanSummary};
use ::time::{format_description::well_known, OffsetDateTime};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Fixed-size worker pool that resolves candidate hosts and probes the reachable ones.
///
/// The resolver and dialer are pluggable so the pool can run against the system
/// network stack or against in-memory fakes.
pub struct Scanner<R = SystemResolver, D = TcpDialer> {
    config: Arc<ScanConfig>,
    resolver: Arc<R>,
    dialer: Arc<D>,
}

impl Scanner {
    /// Scanner using the system resolver and plain TCP connects.
    pub fn new(config: ScanConfig) -> Result<Self, ConfigError> {
        Self::with_network(config, SystemResolver, TcpDialer)
    }
}

impl<R, D> Scanner<R, D>
where
    R: Resolve + 'static,
    D: Dial + 'static,
{
    /// Validates `config` up front; a malformed config never reaches the workers.
    pub fn with_network(config: ScanConfig, resolver: R, dialer: D) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            resolver: Arc::new(resolver),
            dialer: Arc::new(dialer),
        })
    }

    /// Scan every candidate label, reporting progress to `sink`.
    pub async fn run(&self, candidates: &[String], sink: Arc<dyn ProgressSink>) -> ScanOutcome {
        let progress = ProgressTracker::new(candidates.len() as u64, sink);
        self.run_with_progress(candidates, &progress).await
    }

    /// Variant that counts completed jobs on a caller-owned tracker.
    pub async fn run_with_progress(
        &self,
        candidates: &[String],
        progress: &ProgressTracker,
    ) -> ScanOutcome {
        let started_at = now_iso_like();
        let clock = Instant::now();
        let total = candidates.len();
        info!(
            domain = %self.config.domain,
            candidates = total,
            workers = self.config.workers,
            ports = self.config.ports.len(),
            "scan started"
        );

        // Fill the whole job queue before any worker runs, then close it.
        let (job_tx, job_rx) = mpsc::channel::<String>(total.max(1));
        for label in candidates {
            job_tx
                .send(self.config.host_for(label))
                .await
                .expect("job queue sized to candidate count");
        }
        drop(job_tx);

        let jobs = Arc::new(Mutex::new(job_rx));
        let (result_tx, mut result_rx) = mpsc::channel::<ScanResult>(total.max(1));
        let mut set = JoinSet::new();

        for worker_id in 0..self.config.workers.min(total) {
            let jobs = jobs.clone();
            let results = result_tx.clone();
            let progress = progress.clone();
            let config = self.config.clone();
            let resolver = self.resolver.clone();
            let dialer = self.dialer.clone();

            set.spawn(async move {
                let mut handled = 0u64;
                loop {
                    let next = jobs.lock().await.recv().await;
                    let Some(host) = next else {
                        break;
                    };
                    if let Some(result) =
                        scan_host(&config, resolver.as_ref(), dialer.as_ref(), &host).await
                    {
                        // The receiver outlives every worker, so this cannot fail.
                        let _ = results.send(result).await;
                    }
                    progress.increment();
                    handled += 1;
                }
                debug!(worker_id, handled, "worker finished");
            });
        }
        // Only worker-held senders remain; the channel closes when the last worker returns.
        drop(result_tx);

        while let Some(joined) = set.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "scan worker aborted");
            }
        }

        let results = collect_reachable(&mut result_rx).await;
        let summary = ScanSummary {
            total: total as u64,
            scanned: progress.current(),
            reachable: results.len() as u64,
            started_at,
            elapsed_ms: clock.elapsed().as_millis() as u64,
        };
        info!(
            scanned = summary.scanned,
            reachable = summary.reachable,
            elapsed_ms = summary.elapsed_ms,
            "scan finished"
        );
        ScanOutcome { results, summary }
    }
}

/// Process one fully-qualified host.
///
/// Returns `None` when the host has no usable IPv4 address; no latency sampling
/// or port probing happens in that case.
pub async fn scan_host<R, D>(
    config: &ScanConfig,
    resolver: &R,
    dialer: &D,
    host: &str,
) -> Option<ScanResult>
where
    R: Resolve + ?Sized,
    D: Dial + ?Sized,
{
    let ip = resolve_ipv4(resolver, host, config.timeout).await?;
    let mut result = ScanResult::resolved(host, ip.to_string());
    result.avg_response_ms = measure_latency(
        dialer,
        ip,
        LATENCY_PROBE_PORT,
        config.ping_count,
        config.timeout,
    )
    .await;

    for port in &config.ports {
        if is_port_open(dialer, host, port, config.timeout).await {
            result.open_ports.push(port.clone());
        }
    }

    debug!(
        host,
        ip = %ip,
        avg_ms = result.avg_response_ms,
        open = ?result.open_ports,
        "host reachable"
    );
    Some(result)
}

/// Drain a closed result stream in arrival order, keeping reachable hosts.
async fn collect_reachable(rx: &mut mpsc::Receiver<ScanResult>) -> Vec<ScanResult> {
    let mut out = Vec::new();
    while let Some(result) = rx.recv().await {
        if result.reachable {
            out.push(result);
        }
    }
    out
}

fn now_iso_like() -> String {
    OffsetDateTime::now_utc()
        .format(&well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}
