//! Job processing pipeline.
//!
//! This crate provides:
//! - Collaborator trait seams (acquisition, transcription, scoring, rendering)
//! - Parallel render coordinator with progress reporting
//! - Per-job processor with scoped working-directory cleanup
//! - Executor loop that drains the queue one job at a time

pub mod collaborators;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod executor;
pub mod processor;

pub use collaborators::{
    FfmpegRenderer, RemoteScorer, RemoteTranscriber, Scorer, ShortRenderer, Transcriber,
    VideoSource, YtDlpSource,
};
pub use config::WorkerConfig;
pub use coordinator::{ParallelRenderCoordinator, RenderOutcome};
pub use error::{WorkerError, WorkerResult};
pub use executor::JobExecutor;
pub use processor::ShortsProcessor;
