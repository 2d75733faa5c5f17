//! Collaborator trait seams and their production implementations.
//!
//! The processor talks to every external system (yt-dlp, ffmpeg, the
//! transcription API, the scoring API) through these narrow traits, so
//! tests can substitute fakes and drive every outcome path.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::warn;

use sgen_client::{ScoringClient, TranscriptionClient};
use sgen_models::{RenderedShort, SegmentCandidate};

use crate::error::{WorkerError, WorkerResult};

/// Acquires a source video to local disk.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Download the video behind `url` into `dest_dir`; returns the local
    /// file path. Failure means the source is unavailable.
    async fn acquire(&self, url: &str, dest_dir: &Path) -> WorkerResult<PathBuf>;
}

/// Produces a transcript from a local media file.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Returns `None` when no transcript could be produced. Never
    /// job-fatal; all remote failures fold into `None` at this boundary.
    async fn transcribe(&self, media: &Path, workdir: &Path) -> WorkerResult<Option<String>>;
}

/// Scores a transcript into candidate segments.
#[async_trait]
pub trait Scorer: Send + Sync {
    /// An empty list is a valid "nothing usable" outcome; errors are
    /// transport-level failures and fatal to the job.
    async fn score(&self, transcript: &str) -> WorkerResult<Vec<SegmentCandidate>>;
}

/// Renders one candidate into a captioned short.
#[async_trait]
pub trait ShortRenderer: Send + Sync {
    async fn render(
        &self,
        source: &Path,
        candidate: &SegmentCandidate,
        caption: &str,
        out_dir: &Path,
        index: usize,
    ) -> WorkerResult<RenderedShort>;
}

/// Production acquisition via yt-dlp.
#[derive(Debug, Default)]
pub struct YtDlpSource;

#[async_trait]
impl VideoSource for YtDlpSource {
    async fn acquire(&self, url: &str, dest_dir: &Path) -> WorkerResult<PathBuf> {
        let video_path = dest_dir.join("video.mp4");
        sgen_media::download_video(url, &video_path)
            .await
            .map_err(|e| WorkerError::source_unavailable(e.to_string()))?;
        Ok(video_path)
    }
}

/// Production transcription: extract audio, post it to the speech-to-text
/// API.
pub struct RemoteTranscriber {
    client: TranscriptionClient,
}

impl RemoteTranscriber {
    pub fn new(client: TranscriptionClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transcriber for RemoteTranscriber {
    async fn transcribe(&self, media: &Path, workdir: &Path) -> WorkerResult<Option<String>> {
        let wav_path = workdir.join("audio.wav");

        if let Err(e) = sgen_media::extract_audio(media, &wav_path).await {
            warn!("Audio extraction failed, no transcript: {}", e);
            return Ok(None);
        }

        match self.client.transcribe(&wav_path).await {
            Ok(transcript) => Ok(transcript),
            Err(e) => {
                warn!("Transcription failed, no transcript: {}", e);
                Ok(None)
            }
        }
    }
}

/// Production scoring via the remote LLM API.
pub struct RemoteScorer {
    client: ScoringClient,
}

impl RemoteScorer {
    pub fn new(client: ScoringClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Scorer for RemoteScorer {
    async fn score(&self, transcript: &str) -> WorkerResult<Vec<SegmentCandidate>> {
        Ok(self.client.score(transcript).await?)
    }
}

/// Production rendering via ffmpeg cut + caption burn.
#[derive(Debug, Default)]
pub struct FfmpegRenderer;

#[async_trait]
impl ShortRenderer for FfmpegRenderer {
    async fn render(
        &self,
        source: &Path,
        candidate: &SegmentCandidate,
        caption: &str,
        out_dir: &Path,
        index: usize,
    ) -> WorkerResult<RenderedShort> {
        Ok(sgen_media::render_short(source, candidate, caption, out_dir, index).await?)
    }
}
