use std::time::Duration;

use crate::error::ConfigError;

/// Port every latency sample connects to, independent of the requested ports.
pub const LATENCY_PROBE_PORT: u16 = 80;

pub const DEFAULT_WORKERS: usize = 200;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_PING_COUNT: u32 = 2;
pub const DEFAULT_WORDLIST: &str = "subdomains.dat";
pub const DEFAULT_OUTPUT: &str = "SDresults.json";

/// Read-only settings shared by every worker for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub domain: String,
    /// Ports to probe on each resolved host, in probe order.
    pub ports: Vec<String>,
    /// Bound applied to every DNS lookup and TCP connect.
    pub timeout: Duration,
    pub ping_count: u32,
    pub workers: usize,
}

impl ScanConfig {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: normalize_domain(&domain.into()),
            ports: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            ping_count: DEFAULT_PING_COUNT,
            workers: DEFAULT_WORKERS,
        }
    }

    pub fn with_ports(mut self, ports: Vec<String>) -> Self {
        self.ports = ports;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_ping_count(mut self, ping_count: u32) -> Self {
        self.ping_count = ping_count;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domain.is_empty() {
            return Err(ConfigError::EmptyDomain);
        }
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.ping_count == 0 {
            return Err(ConfigError::NoSamples);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Join a candidate label with the target domain.
    pub fn host_for(&self, label: &str) -> String {
        format!("{}.{}", label, self.domain)
    }
}

/// Strip surrounding whitespace and dots so `"example.com."` and `" example.com"` join cleanly.
fn normalize_domain(raw: &str) -> String {
    raw.trim().trim_matches('.').to_string()
}
