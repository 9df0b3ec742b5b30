//! In-memory job store.

use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::QueueError;
use crate::types::{ConversionJob, ConversionOutcome, ConversionRequest, JobState};

/// Ordered, in-memory collection of conversion jobs.
///
/// Every mutation happens under a single write lock, so observers always see
/// the job list move atomically from one state to the next. Insertion order
/// is preserved for the lifetime of the process and defines FIFO fairness;
/// `clear_completed` is the only removal path and only touches completed
/// jobs.
#[derive(Debug, Default)]
pub struct ConversionStore {
    jobs: RwLock<Vec<ConversionJob>>,
}

impl ConversionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new queued job built from `request`.
    ///
    /// Callers are expected to have validated the request; there are no
    /// error conditions here.
    pub async fn enqueue(&self, request: ConversionRequest) -> ConversionJob {
        let job = ConversionJob::new(request);
        debug!(job_id = %job.id(), category = %job.request.category, target = %job.request.target_format, "job enqueued");
        let mut jobs = self.jobs.write().await;
        jobs.push(job.clone());
        job
    }

    /// Snapshot of all jobs in insertion order.
    pub async fn jobs(&self) -> Vec<ConversionJob> {
        self.jobs.read().await.clone()
    }

    /// Look up a single job by id.
    pub async fn get(&self, id: Uuid) -> Option<ConversionJob> {
        self.jobs.read().await.iter().find(|j| j.id() == id).cloned()
    }

    /// Whether any job is still waiting to run.
    pub async fn has_queued(&self) -> bool {
        self.jobs
            .read()
            .await
            .iter()
            .any(|j| j.state == JobState::Queued)
    }

    /// Claim the oldest queued job for execution.
    ///
    /// Selection and the transition to `running` (progress 5) happen under
    /// one write lock, so two concurrent claims can never return the same
    /// job.
    pub async fn claim_next(&self) -> Option<ConversionJob> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.iter_mut().find(|j| j.state == JobState::Queued)?;
        job.claim();
        Some(job.clone())
    }

    /// Progress-channel write path.
    ///
    /// Only applied while the job is running; regressions and values over
    /// 100 are ignored, so observed progress is non-decreasing.
    pub async fn update_progress(&self, id: Uuid, percent: u8) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.iter_mut().find(|j| j.id() == id) {
            if job.state == JobState::Running && percent >= job.progress && percent <= 100 {
                job.progress = percent;
            }
        }
    }

    /// First terminal transition for a finished job.
    ///
    /// On success the job becomes `completed` with progress 100 and the
    /// output location; on failure it becomes `failed` with the error
    /// message and progress left at its last reported value. The completion
    /// timestamp is stamped here, once. The runner never calls this twice
    /// for one job; a call on an already-terminal job is ignored.
    pub async fn complete_job(
        &self,
        id: Uuid,
        outcome: ConversionOutcome,
    ) -> Option<ConversionJob> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.iter_mut().find(|j| j.id() == id)?;
        if job.state.is_terminal() {
            warn!(job_id = %id, state = %job.state, "ignoring completion of already-terminal job");
            return Some(job.clone());
        }
        match outcome {
            ConversionOutcome::Success { output_uri } => job.complete(output_uri),
            ConversionOutcome::Failure { error } => job.fail(error),
        }
        Some(job.clone())
    }

    /// Cancel a job that has not started yet.
    ///
    /// Only queued jobs are cancellable; the single running job is never
    /// interrupted, so converter side effects stay intact.
    pub async fn cancel(&self, id: Uuid) -> Result<ConversionJob, QueueError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .iter_mut()
            .find(|j| j.id() == id)
            .ok_or(QueueError::NotFound(id))?;
        if job.state != JobState::Queued {
            return Err(QueueError::NotCancellable {
                id,
                state: job.state,
            });
        }
        job.cancel();
        Ok(job.clone())
    }

    /// Drop all completed jobs. Queued, running, failed and cancelled jobs
    /// stay in the list.
    pub async fn clear_completed(&self) {
        let mut jobs = self.jobs.write().await;
        jobs.retain(|j| j.state != JobState::Completed);
    }
}
