//! Segment cutting and caption burn-in.
//!
//! A short is rendered in two passes, matching the layout of the output
//! directory consumers expect:
//!
//! 1. `cut_segment` extracts `[start, end)` with stream copy into
//!    `short_{n}.mp4` (fast, no re-encode).
//! 2. `burn_caption` re-encodes the cut with a drawtext overlay into
//!    `short_{n}_captioned.mp4`.
//!
//! Time ranges are passed through to FFmpeg unvalidated beyond what the
//! candidate itself guarantees; an out-of-range cut fails there and the
//! failure surfaces to the caller. No retries.

use std::path::Path;
use tracing::info;

use sgen_models::{RenderedShort, SegmentCandidate};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Cut `[start, end)` out of a video with stream copy.
pub async fn cut_segment(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    start_secs: f64,
    end_secs: f64,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    info!(
        "Cutting segment: {} -> {} ({:.2}s - {:.2}s)",
        input.display(),
        output.display(),
        start_secs,
        end_secs
    );

    let cmd = FfmpegCommand::new(input, output)
        .seek(start_secs)
        .duration(end_secs - start_secs)
        .codec_copy();

    FfmpegRunner::new().run(&cmd).await
}

/// Burn a caption onto a clip with drawtext, copying the audio stream.
///
/// Caption styling: white text, fontsize 24, centered horizontally,
/// 50 px above the bottom edge.
pub async fn burn_caption(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    caption: &str,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    let filter = format!(
        "drawtext=text='{}':fontcolor=white:fontsize=24:x=(w-text_w)/2:y=h-50",
        escape_drawtext(caption)
    );

    let cmd = FfmpegCommand::new(input, output)
        .video_filter(filter)
        .audio_codec("copy");

    FfmpegRunner::new().run(&cmd).await
}

/// Render one candidate segment into a captioned short.
///
/// Writes `short_{index+1}.mp4` (intermediate cut) and
/// `short_{index+1}_captioned.mp4` into `out_dir`; the caller owns the
/// directory and its cleanup. Returns the captioned file with the
/// candidate's score attached.
pub async fn render_short(
    source: impl AsRef<Path>,
    candidate: &SegmentCandidate,
    caption: &str,
    out_dir: impl AsRef<Path>,
    index: usize,
) -> MediaResult<RenderedShort> {
    let out_dir = out_dir.as_ref();

    let cut_path = out_dir.join(format!("short_{}.mp4", index + 1));
    let captioned_path = out_dir.join(format!("short_{}_captioned.mp4", index + 1));

    cut_segment(
        source.as_ref(),
        &cut_path,
        candidate.start_secs,
        candidate.end_secs,
    )
    .await?;

    burn_caption(&cut_path, &captioned_path, caption).await?;

    Ok(RenderedShort::new(captioned_path, candidate.viral_score))
}

/// File name a rendered short will be written under.
pub fn short_file_name(index: usize) -> String {
    format!("short_{}_captioned.mp4", index + 1)
}

/// Escape text for use inside a drawtext `text='...'` value.
///
/// Backslash first, then the characters the filter parser treats
/// specially inside a quoted value.
fn escape_drawtext(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push('\u{2019}'),
            ':' => escaped.push_str("\\:"),
            '%' => escaped.push_str("\\%"),
            _ => escaped.push(c),
        }
    }
    escaped
}
