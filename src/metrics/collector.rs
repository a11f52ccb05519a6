use crate::metrics::snapshot::MetricsSnapshot;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

/// Shared counters for one crawl. `urls_discovered` and `urls_visited` are
/// monotone, and `urls_visited` never exceeds `urls_discovered`: a URL is
/// counted discovered when it enters the frontier and visited when its fetch
/// completes.
#[derive(Clone)]
pub struct MetricsCollector {
    urls_discovered: Arc<AtomicU64>,
    urls_visited: Arc<AtomicU64>,
    pages_saved: Arc<AtomicU64>,
    fetch_failures: Arc<AtomicU64>,
    write_failures: Arc<AtomicU64>,
    bytes_written: Arc<AtomicU64>,
    requests_total: Arc<AtomicU64>,
    requests_success: Arc<AtomicU64>,
    total_fetch_time_ms: Arc<AtomicU64>,
    start_time: Arc<Instant>,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            urls_discovered: Arc::new(AtomicU64::new(0)),
            urls_visited: Arc::new(AtomicU64::new(0)),
            pages_saved: Arc::new(AtomicU64::new(0)),
            fetch_failures: Arc::new(AtomicU64::new(0)),
            write_failures: Arc::new(AtomicU64::new(0)),
            bytes_written: Arc::new(AtomicU64::new(0)),
            requests_total: Arc::new(AtomicU64::new(0)),
            requests_success: Arc::new(AtomicU64::new(0)),
            total_fetch_time_ms: Arc::new(AtomicU64::new(0)),
            start_time: Arc::new(Instant::now()),
        }
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_discovered(&self) {
        self.urls_discovered.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_visited(&self) {
        self.urls_visited.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_saved(&self, bytes: u64) {
        self.pages_saved.fetch_add(1, Ordering::SeqCst);
        self.bytes_written.fetch_add(bytes, Ordering::SeqCst);
    }

    pub fn record_write_failure(&self) {
        self.write_failures.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_fetch_success(&self, duration: Duration) {
        self.requests_total.fetch_add(1, Ordering::SeqCst);
        self.requests_success.fetch_add(1, Ordering::SeqCst);
        self.total_fetch_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn record_fetch_failure(&self, duration: Duration) {
        self.requests_total.fetch_add(1, Ordering::SeqCst);
        self.fetch_failures.fetch_add(1, Ordering::SeqCst);
        self.total_fetch_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let discovered = self.urls_discovered.load(Ordering::SeqCst);
        let visited = self.urls_visited.load(Ordering::SeqCst);
        let total_requests = self.requests_total.load(Ordering::SeqCst);
        let success = self.requests_success.load(Ordering::SeqCst);
        let total_time = self.total_fetch_time_ms.load(Ordering::SeqCst);

        let progress_percent = if discovered > 0 {
            (visited as f64 / discovered as f64) * 100.0
        } else {
            0.0
        };

        let success_rate = if total_requests > 0 {
            (success as f64 / total_requests as f64) * 100.0
        } else {
            0.0
        };

        let avg_fetch_time_ms = if total_requests > 0 {
            total_time / total_requests
        } else {
            0
        };

        let elapsed = self.start_time.elapsed().as_secs_f64();

        MetricsSnapshot {
            urls_discovered: discovered,
            urls_visited: visited,
            pages_saved: self.pages_saved.load(Ordering::SeqCst),
            fetch_failures: self.fetch_failures.load(Ordering::SeqCst),
            write_failures: self.write_failures.load(Ordering::SeqCst),
            bytes_written: self.bytes_written.load(Ordering::SeqCst),
            requests_total: total_requests,
            requests_success: success,
            progress_percent,
            success_rate,
            avg_fetch_time_ms,
            requests_per_second: if elapsed > 0.0 {
                total_requests as f64 / elapsed
            } else {
                0.0
            },
            elapsed_seconds: elapsed,
        }
    }
}
