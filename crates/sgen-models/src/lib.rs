//! Shared data models for the shortgen backend.
//!
//! This crate provides Serde-serializable types for:
//! - Jobs and job results
//! - Scored segment candidates and rendered shorts
//! - Caption text normalization

pub mod caption;
pub mod job;
pub mod result;
pub mod segment;

// Re-export common types
pub use caption::normalize_caption;
pub use job::{JobId, JobState, ShortsJob};
pub use result::{JobResult, RenderedShort};
pub use segment::SegmentCandidate;
