//! Job result types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A finished captioned clip derived from one segment candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedShort {
    /// Path to the produced media file
    pub file: PathBuf,
    /// Score copied from the source candidate
    pub viral_score: u32,
}

impl RenderedShort {
    pub fn new(file: impl Into<PathBuf>, viral_score: u32) -> Self {
        Self {
            file: file.into(),
            viral_score,
        }
    }

    /// File name of the rendered short, if the path has one.
    pub fn file_name(&self) -> Option<&str> {
        self.file.file_name().and_then(|n| n.to_str())
    }
}

/// Outcome of one job.
///
/// A job with zero usable candidates is `Failed`, never an empty
/// `Completed` — "nothing produced" and "produced nothing" look the same
/// to consumers and are collapsed deliberately.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum JobResult {
    /// Shorts were rendered and bundled.
    Completed {
        /// Rendered shorts, descending viral score
        shorts: Vec<RenderedShort>,
        /// Path to the zip bundle containing all shorts
        bundle: PathBuf,
    },
    /// No shorts were produced.
    Failed {
        /// Generic failure reason (not a detailed error report)
        reason: String,
    },
}

impl JobResult {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, JobResult::Completed { .. })
    }

    /// Rendered shorts, or an empty slice for failed jobs.
    pub fn shorts(&self) -> &[RenderedShort] {
        match self {
            JobResult::Completed { shorts, .. } => shorts,
            JobResult::Failed { .. } => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_result_has_no_shorts() {
        let result = JobResult::failed("no candidates");
        assert!(!result.is_completed());
        assert!(result.shorts().is_empty());
    }

    #[test]
    fn result_serializes_with_outcome_tag() {
        let result = JobResult::Completed {
            shorts: vec![RenderedShort::new("short_1_captioned.mp4", 90)],
            bundle: PathBuf::from("shorts_bundle.zip"),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"], "completed");
        assert_eq!(json["shorts"][0]["viral_score"], 90);
    }
}
