//! Audio extraction for transcription.

use std::path::Path;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Extract a mono 16 kHz wav track from a video file.
///
/// This is the input format the speech-to-text API expects.
pub async fn extract_audio(video: impl AsRef<Path>, wav: impl AsRef<Path>) -> MediaResult<()> {
    let video = video.as_ref();
    let wav = wav.as_ref();

    if !video.exists() {
        return Err(MediaError::FileNotFound(video.to_path_buf()));
    }

    info!(
        "Extracting audio: {} -> {}",
        video.display(),
        wav.display()
    );

    let cmd = FfmpegCommand::new(video, wav)
        .no_video()
        .audio_rate(16_000)
        .audio_channels(1);

    FfmpegRunner::new().run(&cmd).await
}
