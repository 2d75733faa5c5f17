//! Application state.

use std::sync::Arc;

use sgen_queue::{JobQueue, ResultStore};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub queue: Arc<JobQueue>,
    pub results: Arc<ResultStore>,
}

impl AppState {
    /// Create new application state around an existing queue and store.
    ///
    /// The same `Arc`s are handed to the job executor so handlers and the
    /// control loop observe one queue.
    pub fn new(config: ApiConfig, queue: Arc<JobQueue>, results: Arc<ResultStore>) -> Self {
        Self {
            config,
            queue,
            results,
        }
    }
}
