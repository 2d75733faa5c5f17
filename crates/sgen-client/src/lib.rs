//! HTTP clients for the remote transcription and scoring collaborators.
//!
//! Both clients are thin reqwest wrappers with env-driven configuration
//! and retry for transient network failures. The transcription client
//! deliberately folds remote failures into "no transcript" rather than an
//! error; the scoring client distinguishes transport failures (errors)
//! from unusable model output (an empty candidate list).

pub mod error;
pub mod scoring;
pub mod transcription;

pub use error::{ClientError, ClientResult};
pub use scoring::{ScoringClient, ScoringConfig};
pub use transcription::{TranscriptionClient, TranscriptionConfig};
