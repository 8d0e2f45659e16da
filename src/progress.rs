use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Receives `(current, total)` after every finished job.
pub trait ProgressSink: Send + Sync {
    fn report(&self, current: u64, total: u64);
}

impl<F> ProgressSink for F
where
    F: Fn(u64, u64) + Send + Sync,
{
    fn report(&self, current: u64, total: u64) {
        self(current, total)
    }
}

/// Sink that discards progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _current: u64, _total: u64) {}
}

/// Completed-job counter for a single scan run.
///
/// Cloning shares the same counter. There is no reset; build a new tracker per run.
#[derive(Clone)]
pub struct ProgressTracker {
    done: Arc<AtomicU64>,
    total: u64,
    sink: Arc<dyn ProgressSink>,
}

impl ProgressTracker {
    pub fn new(total: u64, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            done: Arc::new(AtomicU64::new(0)),
            total,
            sink,
        }
    }

    pub fn silent(total: u64) -> Self {
        Self::new(total, Arc::new(NoProgress))
    }

    /// Record one finished job and forward the new count to the sink.
    pub fn increment(&self) -> u64 {
        let current = self.done.fetch_add(1, Ordering::AcqRel) + 1;
        self.sink.report(current, self.total);
        current
    }

    pub fn current(&self) -> u64 {
        self.done.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("done", &self.current())
            .field("total", &self.total)
            .finish()
    }
}
