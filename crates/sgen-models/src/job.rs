//! Job definitions for queue processing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job state as observed through the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Job is waiting in queue
    #[default]
    Queued,
    /// Job is being processed
    Processing,
    /// Job completed successfully
    Completed,
    /// Job failed
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Queued => "queued",
            JobState::Processing => "processing",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

/// One end-to-end request to turn a source video into captioned shorts.
///
/// Immutable once created. Owned by the queue until dequeued, then
/// transiently by the processor until it finishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortsJob {
    /// Unique job ID
    pub job_id: JobId,
    /// Source video URL
    pub source_url: String,
    /// When the job was submitted
    pub submitted_at: DateTime<Utc>,
}

impl ShortsJob {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            job_id: JobId::new(),
            source_url: source_url.into(),
            submitted_at: Utc::now(),
        }
    }
}
