//! Progress bands and sinks.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use storyreel_core::{JobId, JobStatus, ProgressUpdate};
use storyreel_error::{PipelineError, PipelineErrorKind, StoryreelResult};
use storyreel_interface::ProgressSink;
use tokio::sync::RwLock;

/// Slice of overall progress owned by one stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressBand {
    start: f64,
    end: f64,
}

impl ProgressBand {
    /// Image expansion: 0.1 to 0.4.
    pub const EXPANSION: ProgressBand = ProgressBand::new(0.1, 0.4);
    /// Voice synthesis: 0.4 to 0.6.
    pub const VOICE: ProgressBand = ProgressBand::new(0.4, 0.6);
    /// Composition: 0.6 to 1.0.
    pub const COMPOSITION: ProgressBand = ProgressBand::new(0.6, 1.0);

    /// Band from `start` to `end`.
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Overall progress at the start of the band.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Overall progress at `fraction` (clamped to `[0, 1]`) of the way through the band.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyreel_pipeline::ProgressBand;
    ///
    /// assert_eq!(ProgressBand::VOICE.at(0.5), 0.5);
    /// assert_eq!(ProgressBand::COMPOSITION.at(2.0), 1.0);
    /// ```
    pub fn at(&self, fraction: f64) -> f64 {
        self.start + (self.end - self.start) * fraction.clamp(0.0, 1.0)
    }
}

/// In-memory record of the last known state of every job.
///
/// Progress reported for a job never decreases and terminal jobs ignore further
/// updates. A restarted attempt may move the status back to pending; its progress
/// stays at the highest value seen until the new attempt passes it.
///
/// Updates can be forwarded to another sink, typically [`TracingProgressSink`].
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<JobId, ProgressUpdate>>,
    forward: Option<Arc<dyn ProgressSink>>,
}

impl InMemoryJobStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store that also passes every accepted update to `sink`.
    pub fn with_forward(sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            jobs: RwLock::default(),
            forward: Some(sink),
        }
    }

    /// Last known state of `job_id`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineErrorKind::JobNotFound`] for unknown jobs.
    pub async fn status(&self, job_id: &JobId) -> StoryreelResult<ProgressUpdate> {
        self.jobs
            .read()
            .await
            .get(job_id)
            .cloned()
            .ok_or_else(|| PipelineError::new(PipelineErrorKind::JobNotFound(job_id.to_string())).into())
    }

    /// Number of jobs known to the store.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// True when no job has been recorded.
    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    /// Applies `update` and returns the stored state, or `None` if it was ignored.
    async fn apply(&self, job_id: JobId, mut update: ProgressUpdate) -> Option<ProgressUpdate> {
        let mut jobs = self.jobs.write().await;
        if let Some(current) = jobs.get(&job_id) {
            if current.status.is_terminal() {
                tracing::warn!(
                    job_id = %job_id,
                    current = %current.status,
                    ignored = %update.status,
                    "Ignoring update to finished job"
                );
                return None;
            }
            update.progress = update.progress.max(current.progress);
        }
        if update.progress.is_nan() {
            update.progress = 0.0;
        }
        update.progress = update.progress.clamp(0.0, 1.0);
        if update.status == JobStatus::Completed {
            update.progress = 1.0;
        }
        jobs.insert(job_id, update.clone());
        Some(update)
    }
}

#[async_trait]
impl ProgressSink for InMemoryJobStore {
    async fn publish(&self, job_id: JobId, update: ProgressUpdate) {
        if let Some(stored) = self.apply(job_id, update).await {
            if let Some(forward) = &self.forward {
                forward.publish(job_id, stored).await;
            }
        }
    }
}

/// Sink that logs every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgressSink;

#[async_trait]
impl ProgressSink for TracingProgressSink {
    async fn publish(&self, job_id: JobId, update: ProgressUpdate) {
        match update.status {
            JobStatus::Failed => tracing::error!(
                job_id = %job_id,
                progress = update.progress,
                error = update.error.as_deref().unwrap_or_default(),
                "{}",
                update.message
            ),
            JobStatus::Completed => tracing::info!(
                job_id = %job_id,
                output_url = update.output_url.as_deref().unwrap_or_default(),
                "{}",
                update.message
            ),
            status => tracing::info!(
                job_id = %job_id,
                status = %status,
                progress = %format!("{:.0}%", update.progress * 100.0),
                "{}",
                update.message
            ),
        }
    }
}
