use thiserror::Error;

/// Preconditions a scan configuration must satisfy before any worker starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("target domain is empty")]
    EmptyDomain,

    #[error("worker pool size must be at least 1")]
    NoWorkers,

    #[error("latency sample count must be at least 1")]
    NoSamples,

    #[error("probe timeout must be greater than zero")]
    ZeroTimeout,
}
