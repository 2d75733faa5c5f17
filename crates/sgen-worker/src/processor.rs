//! Per-job processing pipeline.
//!
//! Runs acquisition, transcription, and scoring sequentially, fans the
//! candidates out to the render coordinator, publishes the survivors to
//! the results directory, and bundles them. Every job gets a scratch
//! directory that is removed on every exit path; only published outputs
//! outlive the job.

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use sgen_models::{normalize_caption, JobResult, RenderedShort, ShortsJob};

use crate::collaborators::{
    FfmpegRenderer, RemoteScorer, RemoteTranscriber, Scorer, Transcriber, VideoSource, YtDlpSource,
};
use crate::config::WorkerConfig;
use crate::coordinator::ParallelRenderCoordinator;
use crate::error::{WorkerError, WorkerResult};

/// Processes one job end to end.
pub struct ShortsProcessor {
    config: WorkerConfig,
    source: Arc<dyn VideoSource>,
    transcriber: Arc<dyn Transcriber>,
    scorer: Arc<dyn Scorer>,
    coordinator: ParallelRenderCoordinator,
}

impl ShortsProcessor {
    /// Create a processor with explicit collaborators.
    pub fn new(
        config: WorkerConfig,
        source: Arc<dyn VideoSource>,
        transcriber: Arc<dyn Transcriber>,
        scorer: Arc<dyn Scorer>,
        coordinator: ParallelRenderCoordinator,
    ) -> Self {
        Self {
            config,
            source,
            transcriber,
            scorer,
            coordinator,
        }
    }

    /// Create a processor wired to the production collaborators.
    pub fn production(config: WorkerConfig) -> WorkerResult<Self> {
        let transcriber = RemoteTranscriber::new(sgen_client::TranscriptionClient::from_env()?);
        let scorer = RemoteScorer::new(sgen_client::ScoringClient::from_env()?);
        let coordinator = ParallelRenderCoordinator::new(
            Arc::new(FfmpegRenderer),
            config.render_parallelism,
        );

        Ok(Self::new(
            config,
            Arc::new(YtDlpSource),
            Arc::new(transcriber),
            Arc::new(scorer),
            coordinator,
        ))
    }

    /// Process a job to a result.
    ///
    /// Never returns an error: every failure path collapses into
    /// [`JobResult::Failed`] so the caller can store it and move on.
    pub async fn process(&self, job: &ShortsJob) -> JobResult {
        match self.run(job).await {
            Ok(result) => result,
            Err(e) => {
                error!(job_id = %job.job_id, error = %e, "Job failed");
                JobResult::failed("no shorts produced")
            }
        }
    }

    async fn run(&self, job: &ShortsJob) -> WorkerResult<JobResult> {
        tokio::fs::create_dir_all(&self.config.work_dir).await?;

        // Scratch space for the download, audio, and intermediate clips.
        // Dropping the TempDir removes it recursively on every exit path.
        let scratch = tempfile::Builder::new()
            .prefix(job.job_id.as_str())
            .tempdir_in(&self.config.work_dir)?;

        info!(job_id = %job.job_id, url = %job.source_url, "Processing job");

        let video = self.source.acquire(&job.source_url, scratch.path()).await?;

        let transcript = self
            .transcriber
            .transcribe(&video, scratch.path())
            .await?;

        let candidates = match transcript.as_deref() {
            Some(text) => self.scorer.score(text).await?,
            None => {
                warn!(job_id = %job.job_id, "No transcript, skipping scoring");
                Vec::new()
            }
        };

        if candidates.is_empty() {
            info!(job_id = %job.job_id, "No candidate segments");
            return Ok(JobResult::failed("no viral segments found"));
        }

        let caption = normalize_caption(transcript.as_deref().unwrap_or_default());
        let job_id = job.job_id.clone();

        let outcomes = self
            .coordinator
            .render_all(
                &video,
                &candidates,
                &caption,
                scratch.path(),
                move |fraction| {
                    info!(job_id = %job_id, progress = fraction, "Render progress");
                },
            )
            .await;

        // All-or-nothing: one failed render fails the whole batch.
        // Finished siblings stay in the scratch directory and vanish
        // with it.
        let mut shorts = Vec::with_capacity(outcomes.len());
        for (_, outcome) in outcomes {
            shorts.push(outcome?);
        }

        let published = self.publish(&job.job_id.to_string(), &shorts).await?;
        let out_dir = Path::new(&self.config.results_dir).join(job.job_id.as_str());
        let bundle = sgen_media::bundle_shorts(&published, &out_dir).await?;

        info!(
            job_id = %job.job_id,
            shorts = published.len(),
            bundle = %bundle.display(),
            "Job completed"
        );

        Ok(JobResult::Completed {
            shorts: published,
            bundle,
        })
    }

    /// Copy rendered shorts from scratch space into the per-job results
    /// directory, preserving order.
    async fn publish(
        &self,
        job_id: &str,
        shorts: &[RenderedShort],
    ) -> WorkerResult<Vec<RenderedShort>> {
        let out_dir = Path::new(&self.config.results_dir).join(job_id);
        tokio::fs::create_dir_all(&out_dir).await?;

        let mut published = Vec::with_capacity(shorts.len());
        for short in shorts {
            let name = short
                .file_name()
                .ok_or_else(|| WorkerError::job_failed("rendered short has no file name"))?;
            let dest = out_dir.join(name);
            tokio::fs::copy(&short.file, &dest).await?;
            published.push(RenderedShort::new(dest, short.viral_score));
        }
        Ok(published)
    }
}
