//! FIFO job queue with a single processing slot.
//!
//! The slot is the concurrency token of the whole system: at most one
//! job is ever in flight, everything else waits in submission order.
//! State is either idle or processing exactly one job id; the two are
//! mutually exclusive by construction since both live behind one lock.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use sgen_models::{JobId, ShortsJob};

/// Slot acquire/release counters, exposed for instrumentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCounts {
    pub acquired: u64,
    pub released: u64,
}

#[derive(Debug, Default)]
struct QueueState {
    queue: VecDeque<ShortsJob>,
    processing: Option<JobId>,
    slots_acquired: u64,
    slots_released: u64,
}

/// In-memory FIFO of submitted jobs.
///
/// Mutated by request handlers (enqueue) and the executor loop
/// (dequeue/release); all access goes through one internal lock with
/// short critical sections.
#[derive(Debug, Default)]
pub struct JobQueue {
    inner: Mutex<QueueState>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a job at the tail of the queue.
    pub fn enqueue(&self, job: ShortsJob) {
        let mut state = self.inner.lock().expect("queue lock poisoned");
        info!(job_id = %job.job_id, url = %job.source_url, "Job enqueued");
        state.queue.push_back(job);
    }

    /// Dequeue the head job, but only when no job is in flight.
    ///
    /// On success the returned [`ProcessingSlot`] marks the queue as
    /// processing; dropping it releases the slot. Callers must hold the
    /// slot for the whole lifetime of the job's processing.
    pub fn dequeue_if_idle(self: &Arc<Self>) -> Option<(ShortsJob, ProcessingSlot)> {
        let mut state = self.inner.lock().expect("queue lock poisoned");

        if state.processing.is_some() {
            return None;
        }

        let job = state.queue.pop_front()?;
        state.processing = Some(job.job_id.clone());
        state.slots_acquired += 1;

        debug!(job_id = %job.job_id, "Processing slot acquired");

        let slot = ProcessingSlot {
            queue: Arc::clone(self),
            job_id: job.job_id.clone(),
        };
        Some((job, slot))
    }

    /// Number of jobs waiting (not counting the one in flight).
    pub fn len(&self) -> usize {
        self.inner.lock().expect("queue lock poisoned").queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the processing slot is free.
    pub fn is_idle(&self) -> bool {
        self.inner
            .lock()
            .expect("queue lock poisoned")
            .processing
            .is_none()
    }

    /// Job currently holding the processing slot, if any.
    pub fn processing_job(&self) -> Option<JobId> {
        self.inner
            .lock()
            .expect("queue lock poisoned")
            .processing
            .clone()
    }

    /// Zero-based position of a queued job, if it is still waiting.
    pub fn position(&self, job_id: &JobId) -> Option<usize> {
        self.inner
            .lock()
            .expect("queue lock poisoned")
            .queue
            .iter()
            .position(|j| &j.job_id == job_id)
    }

    /// Slot acquire/release counters.
    pub fn slot_counts(&self) -> SlotCounts {
        let state = self.inner.lock().expect("queue lock poisoned");
        SlotCounts {
            acquired: state.slots_acquired,
            released: state.slots_released,
        }
    }

    fn release(&self, job_id: &JobId) {
        let mut state = self.inner.lock().expect("queue lock poisoned");
        if state.processing.as_ref() == Some(job_id) {
            state.processing = None;
        }
        state.slots_released += 1;
        debug!(job_id = %job_id, "Processing slot released");
    }
}

/// RAII guard for the single processing slot.
///
/// Releases the slot exactly once when dropped, on every exit path
/// (success, failure, or panic unwind).
#[derive(Debug)]
pub struct ProcessingSlot {
    queue: Arc<JobQueue>,
    job_id: JobId,
}

impl ProcessingSlot {
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }
}

impl Drop for ProcessingSlot {
    fn drop(&mut self) {
        self.queue.release(&self.job_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue_with_jobs(urls: &[&str]) -> (Arc<JobQueue>, Vec<JobId>) {
        let queue = Arc::new(JobQueue::new());
        let ids = urls
            .iter()
            .map(|url| {
                let job = ShortsJob::new(*url);
                let id = job.job_id.clone();
                queue.enqueue(job);
                id
            })
            .collect();
        (queue, ids)
    }

    #[test]
    fn dequeue_is_fifo() {
        let (queue, ids) = queue_with_jobs(&["https://a", "https://b", "https://c"]);

        let (job, slot) = queue.dequeue_if_idle().unwrap();
        assert_eq!(job.job_id, ids[0]);
        drop(slot);

        let (job, slot) = queue.dequeue_if_idle().unwrap();
        assert_eq!(job.job_id, ids[1]);
        drop(slot);

        let (job, _slot) = queue.dequeue_if_idle().unwrap();
        assert_eq!(job.job_id, ids[2]);
    }

    #[test]
    fn slot_blocks_second_dequeue_until_dropped() {
        let (queue, _) = queue_with_jobs(&["https://a", "https://b"]);

        let (_job, slot) = queue.dequeue_if_idle().unwrap();
        assert!(!queue.is_idle());
        assert!(queue.dequeue_if_idle().is_none());

        drop(slot);
        assert!(queue.is_idle());
        assert!(queue.dequeue_if_idle().is_some());
    }

    #[test]
    fn processing_is_idle_xor_one_job() {
        let (queue, ids) = queue_with_jobs(&["https://a"]);

        assert!(queue.is_idle());
        assert_eq!(queue.processing_job(), None);

        let (_job, slot) = queue.dequeue_if_idle().unwrap();
        assert_eq!(queue.processing_job(), Some(ids[0].clone()));
        assert!(!queue.is_idle());

        drop(slot);
        assert_eq!(queue.processing_job(), None);
    }

    #[test]
    fn slot_counters_balance_after_every_job() {
        let (queue, _) = queue_with_jobs(&["https://a", "https://b"]);

        for _ in 0..2 {
            let (_job, slot) = queue.dequeue_if_idle().unwrap();
            let counts = queue.slot_counts();
            assert_eq!(counts.acquired, counts.released + 1);
            drop(slot);
        }

        let counts = queue.slot_counts();
        assert_eq!(counts.acquired, 2);
        assert_eq!(counts.released, 2);
    }

    #[test]
    fn slot_released_even_when_holder_panics() {
        let (queue, _) = queue_with_jobs(&["https://a"]);

        let queue_clone = Arc::clone(&queue);
        let result = std::panic::catch_unwind(move || {
            let (_job, _slot) = queue_clone.dequeue_if_idle().unwrap();
            panic!("processing blew up");
        });
        assert!(result.is_err());

        assert!(queue.is_idle());
        let counts = queue.slot_counts();
        assert_eq!(counts.acquired, counts.released);
    }

    #[test]
    fn position_tracks_waiting_jobs_only() {
        let (queue, ids) = queue_with_jobs(&["https://a", "https://b"]);
        assert_eq!(queue.position(&ids[0]), Some(0));
        assert_eq!(queue.position(&ids[1]), Some(1));

        let (_job, _slot) = queue.dequeue_if_idle().unwrap();
        assert_eq!(queue.position(&ids[0]), None);
        assert_eq!(queue.position(&ids[1]), Some(0));
    }

    #[test]
    fn empty_queue_dequeues_nothing() {
        let queue = Arc::new(JobQueue::new());
        assert!(queue.dequeue_if_idle().is_none());
        assert!(queue.is_empty());
    }
}
