//! The job state machine driver.

use crate::{ProgressBand, SlideEnricher};
use async_trait::async_trait;
use std::sync::Arc;
use storyreel_compositor::{Composition, Compositor};
use storyreel_core::{Job, JobId, JobStatus, ProgressUpdate};
use storyreel_error::StoryreelResult;
use storyreel_interface::{CompositionProgress, MediaGenerator, ProgressSink};
use tracing::{error, info, instrument};

/// Runs one job through its stages.
///
/// ```text
/// PENDING -> EXPANDING_IMAGES -> GENERATING_VOICE -> COMPOSING -> COMPLETED
///              (if enabled)                                     \-> FAILED
/// ```
///
/// Entering each state publishes an update. Enrichment failures degrade single
/// slides; any other error fails the job and no video is surfaced.
pub struct PipelineOrchestrator {
    enricher: SlideEnricher,
    compositor: Arc<Compositor>,
    sink: Arc<dyn ProgressSink>,
}

impl PipelineOrchestrator {
    /// Orchestrator wiring the given collaborators.
    pub fn new(
        generator: Arc<dyn MediaGenerator>,
        compositor: Arc<Compositor>,
        sink: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            enricher: SlideEnricher::new(generator),
            compositor,
            sink,
        }
    }

    /// Runs `job` to a terminal state, publishing the failure if there is one.
    ///
    /// # Errors
    ///
    /// Returns the error that failed the job.
    pub async fn run(&self, job: &mut Job) -> StoryreelResult<Composition> {
        let result = self.execute(job).await;
        if result.is_err() {
            self.publish(job).await;
        }
        result
    }

    /// Runs `job` through its stages without publishing a failure.
    ///
    /// On error the job itself is marked failed. Publishing that is left to the
    /// caller, which may still retry.
    ///
    /// # Errors
    ///
    /// Returns the first unrecoverable error.
    #[instrument(skip(self, job), fields(job_id = %job.id(), title = %job.title(), slides = job.slides().len()))]
    pub async fn execute(&self, job: &mut Job) -> StoryreelResult<Composition> {
        self.publish(job).await;
        match self.stages(job).await {
            Ok(composition) => {
                info!(url = %composition.url(), "Job completed");
                Ok(composition)
            }
            Err(e) => {
                error!(status = %job.status(), error = %e, "Job failed");
                if let Err(state) = job.fail(e.to_string()) {
                    error!(error = %state, "Could not mark job failed");
                }
                Err(e)
            }
        }
    }

    async fn stages(&self, job: &mut Job) -> StoryreelResult<Composition> {
        if *job.config().ai_image_expansion() {
            self.enter(job, JobStatus::ExpandingImages, ProgressBand::EXPANSION, "Expanding images")
                .await?;
            let report = self
                .enricher
                .expand_images(job, ProgressBand::EXPANSION, self.sink.as_ref())
                .await;
            info!(?report, "Expansion report");
        }

        self.enter(job, JobStatus::GeneratingVoice, ProgressBand::VOICE, "Generating voice")
            .await?;
        let report = self
            .enricher
            .synthesize_voices(job, ProgressBand::VOICE, self.sink.as_ref())
            .await;
        info!(?report, "Voice report");

        self.enter(job, JobStatus::Composing, ProgressBand::COMPOSITION, "Composing video")
            .await?;
        let reporter = ComposeReporter {
            job_id: *job.id(),
            band: ProgressBand::COMPOSITION,
            sink: self.sink.clone(),
        };
        let composition = self
            .compositor
            .compose(job.slides(), job.config(), job.id(), &reporter)
            .await?;

        job.complete(composition.url().clone())?;
        self.publish(job).await;
        Ok(composition)
    }

    async fn enter(
        &self,
        job: &mut Job,
        status: JobStatus,
        band: ProgressBand,
        message: &str,
    ) -> StoryreelResult<()> {
        job.advance(status, message)?;
        job.record_progress(band.start(), message);
        self.publish(job).await;
        Ok(())
    }

    async fn publish(&self, job: &Job) {
        self.sink.publish(*job.id(), job.snapshot()).await;
    }
}

/// Maps composition progress onto the job's composition band.
struct ComposeReporter {
    job_id: JobId,
    band: ProgressBand,
    sink: Arc<dyn ProgressSink>,
}

#[async_trait]
impl CompositionProgress for ComposeReporter {
    async fn report(&self, fraction: f64, message: &str) {
        self.sink
            .publish(
                self.job_id,
                ProgressUpdate::new(JobStatus::Composing, self.band.at(fraction), message),
            )
            .await;
    }
}
