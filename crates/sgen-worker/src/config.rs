//! Worker configuration.

use std::time::Duration;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Scratch directory for per-job working directories
    pub work_dir: String,
    /// Directory where completed shorts and bundles are published
    pub results_dir: String,
    /// Concurrent render tasks within one job
    pub render_parallelism: usize,
    /// How often the executor polls the queue when idle
    pub poll_interval: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            work_dir: "/tmp/shortgen/work".to_string(),
            results_dir: "/tmp/shortgen/results".to_string(),
            render_parallelism: default_parallelism(),
            poll_interval: Duration::from_millis(500),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("SHORTGEN_WORK_DIR")
                .unwrap_or_else(|_| "/tmp/shortgen/work".to_string()),
            results_dir: std::env::var("SHORTGEN_RESULTS_DIR")
                .unwrap_or_else(|_| "/tmp/shortgen/results".to_string()),
            render_parallelism: std::env::var("SHORTGEN_RENDER_PARALLEL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_parallelism),
            poll_interval: Duration::from_millis(
                std::env::var("SHORTGEN_POLL_INTERVAL_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(500),
            ),
        }
    }
}

fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
