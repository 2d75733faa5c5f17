//! Scored segment candidates from AI analysis.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A time range the scoring model proposed as a viral short.
///
/// Produced by the scoring collaborator; read-only input to rendering.
/// `viral_score` is typically bounded 1-100 but is not validated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SegmentCandidate {
    /// Start offset in seconds (non-negative)
    #[serde(rename = "start")]
    pub start_secs: f64,

    /// End offset in seconds (must be greater than start)
    #[serde(rename = "end")]
    pub end_secs: f64,

    /// Viral rank, higher is better
    pub viral_score: u32,
}

impl SegmentCandidate {
    pub fn new(start_secs: f64, end_secs: f64, viral_score: u32) -> Self {
        Self {
            start_secs,
            end_secs,
            viral_score,
        }
    }

    /// Segment length in seconds.
    pub fn duration_secs(&self) -> f64 {
        (self.end_secs - self.start_secs).max(0.0)
    }

    /// Whether the time range is usable (start >= 0, end > start).
    pub fn is_valid_range(&self) -> bool {
        self.start_secs >= 0.0 && self.end_secs > self.start_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_scoring_api_shape() {
        let json = r#"[{"start": 12.5, "end": 31.0, "viral_score": 87}]"#;
        let candidates: Vec<SegmentCandidate> = serde_json::from_str(json).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].start_secs, 12.5);
        assert_eq!(candidates[0].viral_score, 87);
    }

    #[test]
    fn range_validity() {
        assert!(SegmentCandidate::new(0.0, 1.0, 50).is_valid_range());
        assert!(!SegmentCandidate::new(5.0, 5.0, 50).is_valid_range());
        assert!(!SegmentCandidate::new(-1.0, 5.0, 50).is_valid_range());
    }

    #[test]
    fn duration_is_clamped() {
        assert_eq!(SegmentCandidate::new(10.0, 4.0, 1).duration_secs(), 0.0);
        assert_eq!(SegmentCandidate::new(10.0, 16.5, 1).duration_secs(), 6.5);
    }
}
