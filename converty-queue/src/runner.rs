//! Single-worker drain loop.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};
use tracing::{debug, info, warn};

use crate::dispatch::Dispatch;
use crate::progress::StoreProgress;
use crate::store::ConversionStore;
use crate::types::ConversionOutcome;

/// Executes queued jobs strictly one at a time, in enqueue order.
///
/// The runner holds a single-permit semaphore; the permit is owned for the
/// whole drain pass, not per job. At most one job is ever running, and a
/// second pass cannot start while one is active no matter how often
/// [`QueueRunner::kick`] fires.
pub struct QueueRunner {
    store: Arc<ConversionStore>,
    dispatcher: Arc<dyn Dispatch>,
    draining: Arc<Semaphore>,
}

impl QueueRunner {
    pub fn new(store: Arc<ConversionStore>, dispatcher: Arc<dyn Dispatch>) -> Self {
        Self {
            store,
            dispatcher,
            draining: Arc::new(Semaphore::new(1)),
        }
    }

    /// Start a drain pass in a background task.
    ///
    /// Returns immediately; if a pass is already active this is a no-op and
    /// the active pass will pick up any newly queued jobs before it ends.
    pub fn kick(&self) {
        let permit = match Arc::clone(&self.draining).try_acquire_owned() {
            Ok(permit) => permit,
            Err(TryAcquireError::NoPermits) => return,
            Err(TryAcquireError::Closed) => {
                warn!("queue runner semaphore closed; not draining");
                return;
            }
        };
        let store = Arc::clone(&self.store);
        let dispatcher = Arc::clone(&self.dispatcher);
        let draining = Arc::clone(&self.draining);
        tokio::spawn(async move {
            Self::run(store, dispatcher, draining, permit).await;
        });
    }

    /// Drain inline until no queued job remains.
    ///
    /// Returns immediately if a pass is already active elsewhere.
    pub async fn drain(&self) {
        let permit = match Arc::clone(&self.draining).try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => return,
        };
        Self::run(
            Arc::clone(&self.store),
            Arc::clone(&self.dispatcher),
            Arc::clone(&self.draining),
            permit,
        )
        .await;
    }

    async fn run(
        store: Arc<ConversionStore>,
        dispatcher: Arc<dyn Dispatch>,
        draining: Arc<Semaphore>,
        mut permit: OwnedSemaphorePermit,
    ) {
        loop {
            while let Some(job) = store.claim_next().await {
                let id = job.id();
                debug!(
                    job_id = %id,
                    category = %job.request.category,
                    target = %job.request.target_format,
                    "job claimed"
                );

                let sink = StoreProgress::new(Arc::clone(&store), id);
                let outcome = dispatcher.dispatch(&job, &sink).await;

                match &outcome {
                    ConversionOutcome::Success { output_uri } => {
                        info!(job_id = %id, output = %output_uri, "conversion completed");
                    }
                    ConversionOutcome::Failure { error } => {
                        warn!(job_id = %id, %error, "conversion failed");
                    }
                }
                store.complete_job(id, outcome).await;
            }

            drop(permit);

            // A job enqueued between the last empty claim and the permit
            // release may have fired a kick that lost the permit race;
            // re-check before going idle.
            if !store.has_queued().await {
                return;
            }
            permit = match Arc::clone(&draining).try_acquire_owned() {
                Ok(permit) => permit,
                Err(_) => return,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Mutex;
    use uuid::Uuid;

    use super::*;
    use crate::progress::ProgressSink;
    use crate::types::{
        ConversionCategory, ConversionJob, ConversionRequest, JobState,
    };

    /// Dispatcher that records claim order and checks the single-running
    /// invariant on every call. Audio jobs fail, everything else succeeds.
    struct RecordingDispatch {
        store: Arc<ConversionStore>,
        calls: Mutex<Vec<Uuid>>,
        delay: Duration,
    }

    impl RecordingDispatch {
        fn new(store: Arc<ConversionStore>, delay: Duration) -> Self {
            Self {
                store,
                calls: Mutex::new(Vec::new()),
                delay,
            }
        }
    }

    #[async_trait]
    impl Dispatch for RecordingDispatch {
        async fn dispatch(
            &self,
            job: &ConversionJob,
            sink: &dyn ProgressSink,
        ) -> ConversionOutcome {
            let running = self
                .store
                .jobs()
                .await
                .iter()
                .filter(|j| j.state == JobState::Running)
                .count();
            assert_eq!(running, 1, "exactly one job may be running at a time");

            self.calls.lock().await.push(job.id());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            sink.report(50).await;

            if job.request.category == ConversionCategory::Audio {
                ConversionOutcome::failure("audio conversion is not available")
            } else {
                ConversionOutcome::success(format!("file:///out/{}", job.request.source_name))
            }
        }
    }

    fn request(name: &str, category: ConversionCategory) -> ConversionRequest {
        ConversionRequest::new(format!("file:///tmp/{name}"), name, category, "out")
    }

    #[tokio::test]
    async fn drains_in_fifo_order_with_terminal_states() {
        let store = Arc::new(ConversionStore::new());
        let dispatcher = Arc::new(RecordingDispatch::new(Arc::clone(&store), Duration::ZERO));
        let runner = QueueRunner::new(Arc::clone(&store), dispatcher.clone());

        let image = store.enqueue(request("photo.png", ConversionCategory::Image)).await;
        let text = store.enqueue(request("notes.txt", ConversionCategory::Text)).await;
        let audio = store.enqueue(request("song.mp3", ConversionCategory::Audio)).await;

        runner.drain().await;

        let order = dispatcher.calls.lock().await.clone();
        assert_eq!(order, vec![image.id(), text.id(), audio.id()]);

        let jobs = store.jobs().await;
        assert_eq!(jobs[0].state, JobState::Completed);
        assert_eq!(jobs[1].state, JobState::Completed);
        assert_eq!(jobs[2].state, JobState::Failed);
        assert!(jobs[2].error.is_some());

        // Terminal order matches enqueue order.
        let mut stamps: Vec<_> = jobs.iter().map(|j| j.completed_at.unwrap()).collect();
        let sorted = {
            let mut s = stamps.clone();
            s.sort();
            s
        };
        assert_eq!(stamps, sorted);
        stamps.dedup();
        assert_eq!(stamps.len(), 3);
    }

    #[tokio::test]
    async fn kick_refuses_a_second_concurrent_pass() {
        let store = Arc::new(ConversionStore::new());
        let dispatcher = Arc::new(RecordingDispatch::new(
            Arc::clone(&store),
            Duration::from_millis(10),
        ));
        let runner = QueueRunner::new(Arc::clone(&store), dispatcher.clone());

        for i in 0..4 {
            store
                .enqueue(request(&format!("f{i}.txt"), ConversionCategory::Text))
                .await;
        }

        // Fire the trigger far more often than the queue needs.
        for _ in 0..8 {
            runner.kick();
        }

        for _ in 0..200 {
            if store.jobs().await.iter().all(|j| j.state.is_terminal()) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let jobs = store.jobs().await;
        assert!(jobs.iter().all(|j| j.state == JobState::Completed));

        // Each job was dispatched exactly once despite the repeated kicks.
        let calls = dispatcher.calls.lock().await;
        assert_eq!(calls.len(), 4);
        let mut unique = calls.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 4);
    }

    #[tokio::test]
    async fn failure_does_not_stop_the_queue() {
        let store = Arc::new(ConversionStore::new());
        let dispatcher = Arc::new(RecordingDispatch::new(Arc::clone(&store), Duration::ZERO));
        let runner = QueueRunner::new(Arc::clone(&store), dispatcher);

        store.enqueue(request("song.mp3", ConversionCategory::Audio)).await;
        let after = store.enqueue(request("notes.txt", ConversionCategory::Text)).await;

        runner.drain().await;

        assert_eq!(store.get(after.id()).await.unwrap().state, JobState::Completed);
    }

    #[tokio::test]
    async fn jobs_enqueued_mid_drain_run_in_the_same_pass() {
        let store = Arc::new(ConversionStore::new());
        let dispatcher = Arc::new(RecordingDispatch::new(
            Arc::clone(&store),
            Duration::from_millis(10),
        ));
        let runner = Arc::new(QueueRunner::new(Arc::clone(&store), dispatcher.clone()));

        store.enqueue(request("first.txt", ConversionCategory::Text)).await;
        runner.kick();

        tokio::time::sleep(Duration::from_millis(2)).await;
        let late = store.enqueue(request("late.txt", ConversionCategory::Text)).await;

        for _ in 0..200 {
            if store.jobs().await.iter().all(|j| j.state.is_terminal()) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert_eq!(store.get(late.id()).await.unwrap().state, JobState::Completed);
    }
}
