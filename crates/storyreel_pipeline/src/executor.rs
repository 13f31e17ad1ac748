//! Bounded job execution with whole-job retries.

use crate::{InMemoryJobStore, PipelineOrchestrator};
use std::sync::Arc;
use storyreel_compositor::{Composition, Compositor};
use storyreel_core::{Job, JobId, JobStatus, ProgressUpdate, VideoSubmission};
use storyreel_error::{PipelineError, PipelineErrorKind, StoryreelResult};
use storyreel_interface::{MediaGenerator, ProgressSink};
use storyreel_retry::JobRetryPolicy;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{info, instrument};

/// Handle to a submitted job.
#[derive(Debug)]
pub struct JobTicket {
    job_id: JobId,
    handle: JoinHandle<StoryreelResult<Composition>>,
}

impl JobTicket {
    /// Identifier for status queries.
    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    /// Waits for the job to finish all of its attempts.
    ///
    /// # Errors
    ///
    /// Returns the job's final error, or [`PipelineErrorKind::Aborted`] if its task
    /// panicked or was cancelled.
    pub async fn wait(self) -> StoryreelResult<Composition> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(PipelineError::new(PipelineErrorKind::Aborted(e.to_string())).into()),
        }
    }
}

/// Accepts submissions and runs them on a fixed pool of worker slots.
///
/// Each attempt holds one slot for its whole run and starts from a fresh job.
/// Failed attempts are retried according to the [`JobRetryPolicy`]; between attempts
/// the job shows as pending with a retry message, and the failure is published once,
/// after the last attempt.
pub struct JobExecutor {
    orchestrator: Arc<PipelineOrchestrator>,
    store: Arc<InMemoryJobStore>,
    slots: Arc<Semaphore>,
    retry: JobRetryPolicy,
}

impl JobExecutor {
    /// Executor with `slots` concurrent workers (at least one) reporting into `store`.
    pub fn new(
        generator: Arc<dyn MediaGenerator>,
        compositor: Arc<Compositor>,
        store: Arc<InMemoryJobStore>,
        retry: JobRetryPolicy,
        slots: usize,
    ) -> Self {
        let orchestrator = PipelineOrchestrator::new(generator, compositor, store.clone());
        Self {
            orchestrator: Arc::new(orchestrator),
            store,
            slots: Arc::new(Semaphore::new(slots.max(1))),
            retry,
        }
    }

    /// Validates and dispatches `submission`.
    ///
    /// # Errors
    ///
    /// Returns a validation error without dispatching anything.
    #[instrument(skip(self, submission), fields(title = %submission.title, slides = submission.slides.len()))]
    pub async fn submit(&self, submission: VideoSubmission) -> StoryreelResult<JobTicket> {
        submission.validate()?;

        let job_id = JobId::new();
        self.store
            .publish(
                job_id,
                ProgressUpdate::new(JobStatus::Pending, 0.0, "Waiting for a worker"),
            )
            .await;
        info!(job_id = %job_id, "Job accepted");

        let orchestrator = self.orchestrator.clone();
        let store = self.store.clone();
        let slots = self.slots.clone();
        let retry = self.retry;
        let submission = Arc::new(submission);

        let handle = tokio::spawn(async move {
            let key = job_id.to_string();
            let result = retry
                .run(&key, |attempt| {
                    let orchestrator = orchestrator.clone();
                    let store = store.clone();
                    let slots = slots.clone();
                    let submission = submission.clone();
                    async move {
                        let _permit = slots.acquire_owned().await.map_err(|_| {
                            PipelineError::new(PipelineErrorKind::WorkersClosed)
                        })?;
                        let mut job = Job::from_submission(job_id, &submission);
                        let outcome = orchestrator.execute(&mut job).await;
                        if let Err(e) = &outcome {
                            if retry.will_retry(attempt, e) {
                                let notice = format!(
                                    "Attempt {attempt}/{} failed, retrying in {}s: {e}",
                                    retry.max_attempts(),
                                    retry.backoff().as_secs()
                                );
                                store
                                    .publish(job_id, ProgressUpdate::new(JobStatus::Pending, 0.0, notice))
                                    .await;
                            }
                        }
                        outcome
                    }
                })
                .await;

            if let Err(e) = &result {
                let mut update = ProgressUpdate::new(JobStatus::Failed, 0.0, "Video generation failed");
                update.error = Some(e.to_string());
                store.publish(job_id, update).await;
            }
            result
        });

        Ok(JobTicket { job_id, handle })
    }

    /// Last known state of `job_id`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineErrorKind::JobNotFound`] for unknown jobs.
    pub async fn status(&self, job_id: &JobId) -> StoryreelResult<ProgressUpdate> {
        self.store.status(job_id).await
    }

    /// The store receiving this executor's updates.
    pub fn store(&self) -> &Arc<InMemoryJobStore> {
        &self.store
    }
}
