//! Keyed store of completed job results.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::info;

use sgen_models::{JobId, JobResult};

/// In-memory mapping of job id to result.
///
/// Overwrites on duplicate key. No eviction, no TTL, no size bound:
/// results live for the life of the process, which is acceptable only
/// because the process is single-purpose and short-lived.
#[derive(Debug, Default)]
pub struct ResultStore {
    inner: Mutex<HashMap<JobId, JobResult>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a job result, replacing any previous result for the id.
    pub fn put(&self, job_id: JobId, result: JobResult) {
        info!(
            job_id = %job_id,
            completed = result.is_completed(),
            "Job result stored"
        );
        self.inner
            .lock()
            .expect("store lock poisoned")
            .insert(job_id, result);
    }

    /// Fetch a job result by id.
    pub fn get(&self, job_id: &JobId) -> Option<JobResult> {
        self.inner
            .lock()
            .expect("store lock poisoned")
            .get(job_id)
            .cloned()
    }

    /// Whether a result exists for the id.
    pub fn contains(&self, job_id: &JobId) -> bool {
        self.inner
            .lock()
            .expect("store lock poisoned")
            .contains_key(job_id)
    }

    /// Number of stored results.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
