//! Records for asynchronous remote tasks.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// What a remote task produces.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Outpainted image
    #[display("expand_image")]
    ExpandImage,
    /// Synthesized narration
    #[display("synthesize_voice")]
    SynthesizeVoice,
}

/// Lifecycle of a remote task as last observed.
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
pub enum TaskStatus {
    /// Accepted but not started
    #[default]
    #[display("queued")]
    Queued,
    /// In progress
    #[display("running")]
    Running,
    /// Finished with a result
    #[display("succeeded")]
    Succeeded,
    /// Finished with an error
    #[display("failed")]
    Failed,
}

impl TaskStatus {
    /// True once the task will not change again.
    pub fn is_settled(self) -> bool {
        matches!(self, TaskStatus::Succeeded | TaskStatus::Failed)
    }
}

/// One observation of a remote task.
///
/// # Examples
///
/// ```
/// use storyreel_core::{TaskPoll, TaskStatus};
///
/// let poll = TaskPoll::Succeeded("https://cdn/out.png".to_string());
/// assert_eq!(poll.status(), TaskStatus::Succeeded);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum TaskPoll {
    /// Waiting for a worker
    Queued,
    /// Being processed
    Running,
    /// Result URL
    Succeeded(String),
    /// Provider error message
    Failed(String),
}

impl TaskPoll {
    /// Status implied by this observation.
    pub fn status(&self) -> TaskStatus {
        match self {
            TaskPoll::Queued => TaskStatus::Queued,
            TaskPoll::Running => TaskStatus::Running,
            TaskPoll::Succeeded(_) => TaskStatus::Succeeded,
            TaskPoll::Failed(_) => TaskStatus::Failed,
        }
    }
}

/// A remote task tracked for the length of one poll loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ExternalTask {
    /// Provider task identifier
    id: String,
    /// What the task produces
    kind: TaskKind,
    /// Last observed status
    status: TaskStatus,
    /// Result URL once succeeded
    result: Option<String>,
    /// Provider message once failed
    error: Option<String>,
    /// Polls performed so far
    polls: usize,
}

impl ExternalTask {
    /// Starts tracking a freshly submitted task.
    pub fn new(id: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            id: id.into(),
            kind,
            status: TaskStatus::Queued,
            result: None,
            error: None,
            polls: 0,
        }
    }

    /// Folds one poll result into the record.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyreel_core::{ExternalTask, TaskKind, TaskPoll, TaskStatus};
    ///
    /// let mut task = ExternalTask::new("t-9", TaskKind::ExpandImage);
    /// task.observe(&TaskPoll::Running);
    /// task.observe(&TaskPoll::Failed("quota".to_string()));
    /// assert_eq!(*task.status(), TaskStatus::Failed);
    /// assert_eq!(task.error().as_deref(), Some("quota"));
    /// assert_eq!(*task.polls(), 2);
    /// ```
    pub fn observe(&mut self, poll: &TaskPoll) {
        self.polls += 1;
        self.status = poll.status();
        match poll {
            TaskPoll::Succeeded(url) => self.result = Some(url.clone()),
            TaskPoll::Failed(message) => self.error = Some(message.clone()),
            TaskPoll::Queued | TaskPoll::Running => {}
        }
    }
}

/// Parameters for a speech synthesis request.
///
/// # Examples
///
/// ```
/// use storyreel_core::SynthesisRequest;
///
/// let request = SynthesisRequest::builder()
///     .text("Once upon a time")
///     .voice_id("zhitian")
///     .speech_rate(1.25)
///     .prefer_sync(true)
///     .build()
///     .unwrap();
/// assert_eq!(request.voice_id(), "zhitian");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct SynthesisRequest {
    /// Text to speak
    text: String,
    /// Provider voice identifier
    voice_id: String,
    /// Speaking rate multiplier
    speech_rate: f64,
    /// Ask for an inline response instead of an asynchronous task
    #[builder(default)]
    prefer_sync: bool,
}

impl SynthesisRequest {
    /// Creates a new request builder.
    pub fn builder() -> SynthesisRequestBuilder {
        SynthesisRequestBuilder::default()
    }
}

/// What a provider returns when asked to synthesize speech.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisSubmission {
    /// Audio came back inline
    Completed(Vec<u8>),
    /// Audio will be produced by an asynchronous task
    Submitted(String),
}

/// Narration audio ready for composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct SynthesizedVoice {
    /// Where the audio lives
    url: String,
    /// Estimated spoken length in seconds
    estimated_duration_secs: f64,
}

impl SynthesizedVoice {
    /// Creates a voice record.
    pub fn new(url: impl Into<String>, estimated_duration_secs: f64) -> Self {
        Self {
            url: url.into(),
            estimated_duration_secs,
        }
    }
}
