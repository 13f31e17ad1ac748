//! Trait definitions for remote media services and progress reporting.

use async_trait::async_trait;
use storyreel_core::{
    ExpansionStyle, JobId, ProgressUpdate, SynthesisRequest, SynthesisSubmission,
    SynthesizedVoice, TaskKind, TaskPoll, VoiceType,
};
use storyreel_error::StoryreelResult;

/// Low-level remote AI provider speaking a submit-then-poll protocol.
#[async_trait]
pub trait RemoteTaskProvider: Send + Sync {
    /// Provider name (e.g., "dashscope").
    fn provider_name(&self) -> &'static str;

    /// Submits an outpainting job for `image` and returns the provider task id.
    async fn submit_expand(&self, image: &str, style_prompt: &str) -> StoryreelResult<String>;

    /// Submits speech synthesis.
    ///
    /// Providers may answer short requests inline; longer ones return a task id.
    async fn submit_synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> StoryreelResult<SynthesisSubmission>;

    /// Reads the current state of a submitted task.
    async fn poll(&self, kind: TaskKind, task_id: &str) -> StoryreelResult<TaskPoll>;

    /// Downloads a result produced by the provider.
    async fn fetch(&self, url: &str) -> StoryreelResult<Vec<u8>>;
}

/// High-level media operations the slide enricher depends on.
#[async_trait]
pub trait MediaGenerator: Send + Sync {
    /// Outpaints `image` to a widescreen frame and returns the new image URL.
    async fn expand_image(&self, image: &str, style: ExpansionStyle) -> StoryreelResult<String>;

    /// Speaks `text` and returns the stored audio with an estimated duration.
    async fn synthesize_voice(
        &self,
        text: &str,
        voice: VoiceType,
        speed: f64,
    ) -> StoryreelResult<SynthesizedVoice>;
}

/// Receiver of job progress.
///
/// Publishing never fails from the job's point of view; sinks log their own errors.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// Records the latest state of `job_id`.
    async fn publish(&self, job_id: JobId, update: ProgressUpdate);
}

/// Receiver of progress inside the composition stage.
///
/// `fraction` runs from 0.0 to 1.0 across composition only; the caller maps it onto
/// the job's overall progress.
#[async_trait]
pub trait CompositionProgress: Send + Sync {
    /// Reports that composition has reached `fraction`.
    async fn report(&self, fraction: f64, message: &str);
}
