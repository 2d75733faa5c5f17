//! End-to-end pipeline tests with fake collaborators.
//!
//! Everything external (yt-dlp, ffmpeg, transcription, scoring) is
//! faked; the queue, result store, coordinator, processor, and executor
//! are the real thing.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use sgen_models::{JobResult, RenderedShort, SegmentCandidate, ShortsJob};
use sgen_queue::{JobQueue, ResultStore};
use sgen_worker::{
    JobExecutor, ParallelRenderCoordinator, Scorer, ShortRenderer, ShortsProcessor, Transcriber,
    VideoSource, WorkerConfig, WorkerError,
};

/// Shared event log so tests can assert cross-collaborator ordering.
type EventLog = Arc<Mutex<Vec<String>>>;

struct FakeSource {
    events: EventLog,
    queue: Arc<JobQueue>,
    fail: bool,
}

#[async_trait]
impl VideoSource for FakeSource {
    async fn acquire(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, WorkerError> {
        // Exactly one job may be in flight whenever a collaborator runs.
        let counts = self.queue.slot_counts();
        assert_eq!(counts.acquired, counts.released + 1);

        self.events.lock().unwrap().push(format!("acquire {}", url));

        if self.fail {
            return Err(WorkerError::source_unavailable("video is private"));
        }

        let path = dest_dir.join("video.mp4");
        tokio::fs::write(&path, b"fake video").await.unwrap();
        Ok(path)
    }
}

struct FakeTranscriber {
    transcript: Option<String>,
}

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(
        &self,
        _media: &Path,
        _workdir: &Path,
    ) -> Result<Option<String>, WorkerError> {
        Ok(self.transcript.clone())
    }
}

struct FakeScorer {
    candidates: Vec<SegmentCandidate>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Scorer for FakeScorer {
    async fn score(&self, _transcript: &str) -> Result<Vec<SegmentCandidate>, WorkerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.candidates.clone())
    }
}

struct FakeRenderer {
    queue: Arc<JobQueue>,
    fail_index: Option<usize>,
}

#[async_trait]
impl ShortRenderer for FakeRenderer {
    async fn render(
        &self,
        _source: &Path,
        candidate: &SegmentCandidate,
        _caption: &str,
        out_dir: &Path,
        index: usize,
    ) -> Result<RenderedShort, WorkerError> {
        let counts = self.queue.slot_counts();
        assert_eq!(counts.acquired, counts.released + 1);

        if self.fail_index == Some(index) {
            return Err(WorkerError::job_failed(format!("render {} failed", index)));
        }

        let path = out_dir.join(format!("short_{}_captioned.mp4", index + 1));
        tokio::fs::write(&path, format!("clip-{}", index))
            .await
            .unwrap();
        Ok(RenderedShort::new(path, candidate.viral_score))
    }
}

struct Harness {
    queue: Arc<JobQueue>,
    results: Arc<ResultStore>,
    executor: JobExecutor,
    events: EventLog,
    scorer_calls: Arc<AtomicUsize>,
    _dirs: (tempfile::TempDir, tempfile::TempDir),
}

struct HarnessOptions {
    transcript: Option<String>,
    candidates: Vec<SegmentCandidate>,
    source_fails: bool,
    render_fail_index: Option<usize>,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            transcript: Some("a transcript worth clipping".to_string()),
            candidates: scored(&[40, 90, 10]),
            source_fails: false,
            render_fail_index: None,
        }
    }
}

fn scored(scores: &[u32]) -> Vec<SegmentCandidate> {
    scores
        .iter()
        .enumerate()
        .map(|(i, s)| SegmentCandidate::new(i as f64 * 30.0, i as f64 * 30.0 + 15.0, *s))
        .collect()
}

fn harness(options: HarnessOptions) -> Harness {
    let work = tempfile::tempdir().unwrap();
    let results_dir = tempfile::tempdir().unwrap();

    let config = WorkerConfig {
        work_dir: work.path().to_string_lossy().into_owned(),
        results_dir: results_dir.path().to_string_lossy().into_owned(),
        render_parallelism: 4,
        poll_interval: Duration::from_millis(10),
    };

    let queue = Arc::new(JobQueue::new());
    let results = Arc::new(ResultStore::new());
    let events: EventLog = Arc::new(Mutex::new(Vec::new()));
    let scorer_calls = Arc::new(AtomicUsize::new(0));

    let coordinator = ParallelRenderCoordinator::new(
        Arc::new(FakeRenderer {
            queue: Arc::clone(&queue),
            fail_index: options.render_fail_index,
        }),
        config.render_parallelism,
    );

    let processor = ShortsProcessor::new(
        config.clone(),
        Arc::new(FakeSource {
            events: Arc::clone(&events),
            queue: Arc::clone(&queue),
            fail: options.source_fails,
        }),
        Arc::new(FakeTranscriber {
            transcript: options.transcript,
        }),
        Arc::new(FakeScorer {
            candidates: options.candidates,
            calls: Arc::clone(&scorer_calls),
        }),
        coordinator,
    );

    let executor = JobExecutor::new(
        Arc::clone(&queue),
        Arc::clone(&results),
        processor,
        config,
    );

    Harness {
        queue,
        results,
        executor,
        events,
        scorer_calls,
        _dirs: (work, results_dir),
    }
}

#[tokio::test]
async fn job_a_finishes_before_job_b_starts_and_shorts_are_score_sorted() {
    let h = harness(HarnessOptions::default());

    let job_a = ShortsJob::new("https://example.com/a");
    let job_b = ShortsJob::new("https://example.com/b");
    let id_a = job_a.job_id.clone();
    let id_b = job_b.job_id.clone();

    h.queue.enqueue(job_a);
    h.queue.enqueue(job_b);

    assert!(h.executor.process_next().await);
    // A's result is stored and the slot is free before B is touched.
    assert!(h.results.get(&id_a).is_some());
    assert_eq!(h.events.lock().unwrap().len(), 1);

    assert!(h.executor.process_next().await);
    assert!(h.results.get(&id_b).is_some());

    let events = h.events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            "acquire https://example.com/a".to_string(),
            "acquire https://example.com/b".to_string(),
        ]
    );

    let result = h.results.get(&id_a).unwrap();
    let scores: Vec<u32> = result.shorts().iter().map(|s| s.viral_score).collect();
    assert_eq!(scores, vec![90, 40, 10]);

    match result {
        JobResult::Completed { bundle, shorts } => {
            assert!(bundle.exists());
            assert!(shorts.iter().all(|s| s.file.exists()));
        }
        JobResult::Failed { .. } => panic!("job A should have completed"),
    }
}

#[tokio::test]
async fn no_transcript_skips_scoring_and_fails_the_job_releasing_the_slot() {
    let h = harness(HarnessOptions {
        transcript: None,
        ..Default::default()
    });

    let job_a = ShortsJob::new("https://example.com/a");
    let job_b = ShortsJob::new("https://example.com/b");
    let id_a = job_a.job_id.clone();
    let id_b = job_b.job_id.clone();

    h.queue.enqueue(job_a);
    h.queue.enqueue(job_b);

    assert!(h.executor.process_next().await);

    assert_eq!(h.scorer_calls.load(Ordering::SeqCst), 0);
    assert!(!h.results.get(&id_a).unwrap().is_completed());
    assert!(h.queue.is_idle());

    // The next job in the queue still runs.
    assert!(h.executor.process_next().await);
    assert!(!h.results.get(&id_b).unwrap().is_completed());
}

#[tokio::test]
async fn empty_candidate_list_is_an_explicit_failure() {
    let h = harness(HarnessOptions {
        candidates: Vec::new(),
        ..Default::default()
    });

    let job = ShortsJob::new("https://example.com/a");
    let id = job.job_id.clone();
    h.queue.enqueue(job);

    assert!(h.executor.process_next().await);

    let result = h.results.get(&id).unwrap();
    assert!(matches!(result, JobResult::Failed { .. }));
    assert_eq!(h.scorer_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn source_unavailable_fails_the_job_and_releases_the_slot() {
    let h = harness(HarnessOptions {
        source_fails: true,
        ..Default::default()
    });

    let job = ShortsJob::new("https://example.com/private");
    let id = job.job_id.clone();
    h.queue.enqueue(job);

    assert!(h.executor.process_next().await);

    assert!(!h.results.get(&id).unwrap().is_completed());
    let counts = h.queue.slot_counts();
    assert_eq!(counts.acquired, 1);
    assert_eq!(counts.released, 1);
}

#[tokio::test]
async fn one_failed_render_fails_the_whole_batch_but_slot_is_released() {
    let h = harness(HarnessOptions {
        render_fail_index: Some(1),
        ..Default::default()
    });

    let job_a = ShortsJob::new("https://example.com/a");
    let job_b = ShortsJob::new("https://example.com/b");
    let id_a = job_a.job_id.clone();
    h.queue.enqueue(job_a);
    h.queue.enqueue(job_b);

    assert!(h.executor.process_next().await);

    assert!(!h.results.get(&id_a).unwrap().is_completed());

    // Must-release: the failure path freed the slot, so B proceeds.
    assert!(h.queue.is_idle());
    assert!(h.executor.process_next().await);

    let counts = h.queue.slot_counts();
    assert_eq!(counts.acquired, 2);
    assert_eq!(counts.released, 2);
}

#[tokio::test]
async fn executor_loop_drains_interleaved_submissions_one_at_a_time() {
    let h = harness(HarnessOptions::default());

    let queue = Arc::clone(&h.queue);
    let results = Arc::clone(&h.results);

    let mut ids = Vec::new();
    for i in 0..3 {
        let job = ShortsJob::new(format!("https://example.com/{}", i));
        ids.push(job.job_id.clone());
        queue.enqueue(job);
    }

    let executor = Arc::new(h.executor);
    let runner = {
        let executor = Arc::clone(&executor);
        tokio::spawn(async move { executor.run().await })
    };

    // Interleave more submissions while the loop is draining.
    for i in 3..6 {
        tokio::time::sleep(Duration::from_millis(5)).await;
        let job = ShortsJob::new(format!("https://example.com/{}", i));
        ids.push(job.job_id.clone());
        queue.enqueue(job);
    }

    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if ids.iter().all(|id| results.get(id).is_some()) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("all jobs should finish");

    executor.shutdown();
    runner.await.unwrap();

    // FIFO: acquisitions happened in submission order. The in-flight
    // assertion inside the fakes covered the at-most-one invariant.
    let events = h.events.lock().unwrap();
    let expected: Vec<String> = (0..6)
        .map(|i| format!("acquire https://example.com/{}", i))
        .collect();
    assert_eq!(*events, expected);

    let counts = queue.slot_counts();
    assert_eq!(counts.acquired, 6);
    assert_eq!(counts.released, 6);
}
