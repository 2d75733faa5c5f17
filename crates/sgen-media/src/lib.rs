//! Media operations for shortgen.
//!
//! This crate provides:
//! - FFmpeg command builder and runner
//! - Video download via yt-dlp
//! - Audio extraction for transcription
//! - Segment cutting and caption burn-in
//! - Zip bundling of rendered shorts

pub mod archive;
pub mod audio;
pub mod clip;
pub mod command;
pub mod download;
pub mod error;

pub use archive::{bundle_shorts, BUNDLE_FILE_NAME};
pub use audio::extract_audio;
pub use clip::{burn_caption, cut_segment, render_short, short_file_name};
pub use command::{check_ffmpeg, check_ytdlp, FfmpegCommand, FfmpegRunner};
pub use download::download_video;
pub use error::{MediaError, MediaResult};
