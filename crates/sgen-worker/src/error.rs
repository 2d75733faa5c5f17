//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    /// Acquisition failed: the source video cannot be retrieved.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// A remote API client failed (scoring transport errors land here;
    /// transcription failures never do, they fold into "no transcript").
    #[error("Client error: {0}")]
    Client(#[from] sgen_client::ClientError),

    /// A clip cut or caption burn failed.
    #[error("Render failed: {0}")]
    Media(#[from] sgen_media::MediaError),

    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable(msg.into())
    }

    pub fn job_failed(msg: impl Into<String>) -> Self {
        Self::JobFailed(msg.into())
    }
}
