//! Job executor.
//!
//! One control loop owns dequeue/process/store. The single-worker policy
//! is enforced by the queue's processing slot: the next job cannot start
//! until the previous job's slot guard is dropped, and the guard is
//! dropped only after the result is stored.

use std::sync::Arc;

use tracing::info;

use sgen_queue::{JobQueue, ResultStore};

use crate::config::WorkerConfig;
use crate::processor::ShortsProcessor;

/// Executor that drains the queue one job at a time.
pub struct JobExecutor {
    queue: Arc<JobQueue>,
    results: Arc<ResultStore>,
    processor: ShortsProcessor,
    config: WorkerConfig,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl JobExecutor {
    /// Create a new executor.
    pub fn new(
        queue: Arc<JobQueue>,
        results: Arc<ResultStore>,
        processor: ShortsProcessor,
        config: WorkerConfig,
    ) -> Self {
        let (shutdown, _) = tokio::sync::watch::channel(false);
        Self {
            queue,
            results,
            processor,
            config,
            shutdown,
        }
    }

    /// Run the control loop until shutdown.
    pub async fn run(&self) {
        info!(
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            "Starting job executor"
        );

        let mut shutdown_rx = self.shutdown.subscribe();

        loop {
            if self.process_next().await {
                // Drained a job; check the queue again immediately so a
                // backlog is worked off without poll delays.
                continue;
            }

            tokio::select! {
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("Shutdown signal received, stopping executor");
                        break;
                    }
                }
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }

        info!("Job executor stopped");
    }

    /// Process the head job if the slot is free. Returns whether a job
    /// was processed.
    pub async fn process_next(&self) -> bool {
        let Some((job, slot)) = self.queue.dequeue_if_idle() else {
            return false;
        };

        info!(job_id = %job.job_id, "Job dequeued for processing");

        let result = self.processor.process(&job).await;
        self.results.put(job.job_id.clone(), result);

        // Result is visible before the slot frees up the next job.
        drop(slot);
        true
    }

    /// Signal shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }
}
