use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub urls_discovered: u64,
    pub urls_visited: u64,
    pub pages_saved: u64,
    pub fetch_failures: u64,
    pub write_failures: u64,
    pub bytes_written: u64,
    pub requests_total: u64,
    pub requests_success: u64,
    /// `urls_visited / urls_discovered * 100`, the crawl's progress value.
    pub progress_percent: f64,
    pub success_rate: f64,
    pub avg_fetch_time_ms: u64,
    pub requests_per_second: f64,
    pub elapsed_seconds: f64,
}
