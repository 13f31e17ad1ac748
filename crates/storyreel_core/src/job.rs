//! Job identity, status and the state machine that guards them.

use crate::{Slide, VideoConfig, VideoSubmission};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use storyreel_error::{PipelineError, PipelineErrorKind};
use uuid::Uuid;

/// Unique job identifier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
#[display("{}", _0)]
pub struct JobId(Uuid);

impl JobId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Short form used in scratch file names.
    pub fn simple(&self) -> String {
        self.0.simple().to_string()
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::str::FromStr for JobId {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| PipelineError::new(PipelineErrorKind::JobNotFound(s.to_string())))
    }
}

/// Job status, in the only order a job may move through.
///
/// # Examples
///
/// ```
/// use storyreel_core::JobStatus;
///
/// assert!(JobStatus::Pending < JobStatus::Composing);
/// assert!(JobStatus::Failed.is_terminal());
/// assert_eq!(serde_json::to_string(&JobStatus::ExpandingImages).unwrap(), "\"expanding_images\"");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Accepted, waiting for a worker
    #[default]
    #[display("pending")]
    Pending,
    /// Outpainting slide images
    #[display("expanding_images")]
    ExpandingImages,
    /// Synthesizing narration
    #[display("generating_voice")]
    GeneratingVoice,
    /// Encoding the video
    #[display("composing")]
    Composing,
    /// Video published
    #[display("completed")]
    Completed,
    /// Gave up
    #[display("failed")]
    Failed,
}

impl JobStatus {
    /// True for statuses a job never leaves.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether a job in this status may move to `next`.
    ///
    /// Jobs only move forward; skipping a stage is allowed, revisiting one is not.
    pub fn can_advance_to(self, next: JobStatus) -> bool {
        !self.is_terminal() && next > self
    }
}

/// What a status query or a progress sink sees of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current status
    pub status: JobStatus,
    /// Overall completion in `[0, 1]`
    pub progress: f64,
    /// Human-readable stage description
    pub message: String,
    /// Published video, once completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_url: Option<String>,
    /// Captured error, once failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProgressUpdate {
    /// An in-flight update without output or error.
    pub fn new(status: JobStatus, progress: f64, message: impl Into<String>) -> Self {
        Self {
            status,
            progress,
            message: message.into(),
            output_url: None,
            error: None,
        }
    }
}

/// A video job and its lifecycle.
///
/// The job enforces its own invariants: status only moves forward, progress never
/// decreases, and a terminal job rejects every further change.
///
/// # Examples
///
/// ```
/// use storyreel_core::{Job, JobId, JobStatus, SlideSpec, VideoConfig, VideoSubmission};
///
/// let submission = VideoSubmission {
///     title: "Trip".to_string(),
///     description: String::new(),
///     slides: vec![SlideSpec::new("a.jpg")],
///     config: VideoConfig::default(),
/// };
/// let mut job = Job::from_submission(JobId::new(), &submission);
/// job.advance(JobStatus::GeneratingVoice, "Generating voice").unwrap();
/// job.record_progress(0.5, "voice 1/2");
/// job.record_progress(0.3, "stale");
/// assert_eq!(*job.progress(), 0.5);
/// assert!(job.advance(JobStatus::ExpandingImages, "back").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct Job {
    /// Identifier
    id: JobId,
    /// Title
    title: String,
    /// Description
    description: String,
    /// Slides in playback order
    slides: Vec<Slide>,
    /// Render settings
    config: VideoConfig,
    /// Current status
    status: JobStatus,
    /// Completion in `[0, 1]`
    progress: f64,
    /// Stage description
    message: String,
    /// Published video URL
    output_url: Option<String>,
    /// Captured error text
    error: Option<String>,
    /// Creation time
    created_at: DateTime<Utc>,
    /// Last mutation time
    updated_at: DateTime<Utc>,
}

impl Job {
    /// Creates a pending job from a submission.
    pub fn from_submission(id: JobId, submission: &VideoSubmission) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: submission.title.clone(),
            description: submission.description.clone(),
            slides: submission
                .slides
                .iter()
                .enumerate()
                .map(|(index, spec)| Slide::from_spec(index, spec))
                .collect(),
            config: submission.config.clone(),
            status: JobStatus::Pending,
            progress: 0.0,
            message: "Waiting to start".to_string(),
            output_url: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mutable access to the slides for enrichment.
    pub fn slides_mut(&mut self) -> &mut [Slide] {
        &mut self.slides
    }

    /// Moves the job to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineErrorKind::InvalidTransition`] when `next` is not ahead of the
    /// current status or the job is already terminal.
    pub fn advance(&mut self, next: JobStatus, message: impl Into<String>) -> Result<(), PipelineError> {
        if !self.status.can_advance_to(next) {
            return Err(PipelineError::new(PipelineErrorKind::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            }));
        }
        self.status = next;
        self.message = message.into();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Raises progress to `progress` (clamped to `[0, 1]`).
    ///
    /// Lower values and updates to terminal jobs are ignored. Returns whether the job
    /// changed.
    pub fn record_progress(&mut self, progress: f64, message: impl Into<String>) -> bool {
        if self.status.is_terminal() || progress.is_nan() {
            return false;
        }
        let clamped = progress.clamp(0.0, 1.0);
        if clamped < self.progress {
            return false;
        }
        self.progress = clamped;
        self.message = message.into();
        self.updated_at = Utc::now();
        true
    }

    /// Marks the job completed with its published video.
    ///
    /// # Errors
    ///
    /// Fails if the job is already terminal.
    pub fn complete(&mut self, output_url: impl Into<String>) -> Result<(), PipelineError> {
        self.advance(JobStatus::Completed, "Video generated")?;
        self.progress = 1.0;
        self.output_url = Some(output_url.into());
        Ok(())
    }

    /// Marks the job failed, keeping its progress.
    ///
    /// # Errors
    ///
    /// Fails if the job is already terminal.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), PipelineError> {
        self.advance(JobStatus::Failed, "Video generation failed")?;
        self.error = Some(error.into());
        Ok(())
    }

    /// Current externally visible state.
    pub fn snapshot(&self) -> ProgressUpdate {
        ProgressUpdate {
            status: self.status,
            progress: self.progress,
            message: self.message.clone(),
            output_url: self.output_url.clone(),
            error: self.error.clone(),
        }
    }
}
