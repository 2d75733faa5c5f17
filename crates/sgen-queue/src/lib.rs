//! In-memory job queue and result store.
//!
//! This crate provides:
//! - FIFO queue of submitted jobs with a single processing slot
//! - RAII slot guard guaranteeing exactly-once release per job
//! - Keyed store of completed job results
//!
//! Everything lives in process memory; queue contents and results are
//! lost on restart. Durable queueing is deliberately out of scope.

pub mod queue;
pub mod store;

pub use queue::{JobQueue, ProcessingSlot, SlotCounts};
pub use store::ResultStore;
