//! Parallel render coordinator.
//!
//! Fans one render task per candidate onto a semaphore-bounded pool,
//! reports fraction-complete after each finish, and returns per-candidate
//! outcomes sorted by descending viral score. The all-or-nothing decision
//! belongs to the caller; failed siblings run to completion here and are
//! discarded upstream.

use std::path::Path;
use std::sync::{Arc, Mutex};

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::debug;

use sgen_models::{RenderedShort, SegmentCandidate};

use crate::collaborators::ShortRenderer;
use crate::error::WorkerResult;

/// One candidate's render outcome.
pub type RenderOutcome = (SegmentCandidate, WorkerResult<RenderedShort>);

/// Renders all candidates of a job concurrently.
pub struct ParallelRenderCoordinator {
    renderer: Arc<dyn ShortRenderer>,
    parallelism: usize,
}

impl ParallelRenderCoordinator {
    pub fn new(renderer: Arc<dyn ShortRenderer>, parallelism: usize) -> Self {
        Self {
            renderer,
            parallelism: parallelism.max(1),
        }
    }

    /// Render every candidate, invoking `progress` with
    /// `completed / total` after each task finishes.
    ///
    /// Progress values are strictly increasing and end at exactly 1.0;
    /// the callback runs under a lock so reports cannot reorder. The
    /// returned outcomes are sorted by descending viral score, ties
    /// keeping the candidate list's encounter order; task completion
    /// order never leaks into the result.
    pub async fn render_all<F>(
        &self,
        source: &Path,
        candidates: &[SegmentCandidate],
        caption: &str,
        out_dir: &Path,
        progress: F,
    ) -> Vec<RenderOutcome>
    where
        F: Fn(f64) + Send + Sync,
    {
        let total = candidates.len();
        if total == 0 {
            return Vec::new();
        }

        let semaphore = Arc::new(Semaphore::new(self.parallelism));
        let completed = Mutex::new(0usize);
        let progress = &progress;
        let completed = &completed;

        let tasks = candidates.iter().cloned().enumerate().map(|(index, candidate)| {
            let semaphore = Arc::clone(&semaphore);
            let renderer = Arc::clone(&self.renderer);
            async move {
                let _permit = semaphore.acquire().await.expect("semaphore closed");

                let result = renderer
                    .render(source, &candidate, caption, out_dir, index)
                    .await;

                {
                    let mut done = completed.lock().expect("progress lock poisoned");
                    *done += 1;
                    let fraction = *done as f64 / total as f64;
                    debug!(completed = *done, total, "Render task finished");
                    progress(fraction);
                }

                (candidate, result)
            }
        });

        // join_all yields results in candidate order regardless of which
        // task finished first, so the stable sort sees encounter order.
        let mut outcomes: Vec<RenderOutcome> = join_all(tasks).await;
        outcomes.sort_by(|a, b| b.0.viral_score.cmp(&a.0.viral_score));
        outcomes
    }
}
