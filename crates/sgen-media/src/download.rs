//! Video download using yt-dlp.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::command::check_ytdlp;
use crate::error::{MediaError, MediaResult};

/// Download a video from a URL to a local file using yt-dlp.
///
/// Prefers a progressive mp4 stream so the result can be cut with stream
/// copy. Any yt-dlp failure (private/removed video, unsupported URL,
/// network error) surfaces as [`MediaError::DownloadFailed`].
pub async fn download_video(url: &str, output_path: impl AsRef<Path>) -> MediaResult<()> {
    let output_path = output_path.as_ref();

    check_ytdlp()?;

    info!(
        "Downloading video from {} to {}",
        url,
        output_path.display()
    );

    let output_path_str = output_path.to_string_lossy();
    let args = [
        "--no-playlist",
        "--quiet",
        "--no-warnings",
        "-f",
        "best[ext=mp4]/best",
        "-o",
        output_path_str.as_ref(),
        url,
    ];

    let output = Command::new("yt-dlp")
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("yt-dlp stderr: {}", stderr);

        let error_msg = stderr.lines().last().unwrap_or("Unknown error");
        return Err(MediaError::download_failed(format!(
            "yt-dlp failed: {}",
            error_msg
        )));
    }

    if !output_path.exists() {
        return Err(MediaError::download_failed("Output file not created"));
    }

    let file_size = output_path.metadata()?.len();
    info!(
        output = %output_path.display(),
        size_bytes = file_size,
        "Video downloaded"
    );

    Ok(())
}
