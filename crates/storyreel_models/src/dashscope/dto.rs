//! DashScope API data transfer objects.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use storyreel_core::{TaskKind, TaskPoll};

/// Input block of an image synthesis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ImageSynthesisInput {
    /// Text prompt
    prompt: String,
    /// Reference image as URL or base64
    ref_image: String,
    /// Output size as `W*H`
    size: String,
    /// Number of images
    n: u32,
}

impl ImageSynthesisInput {
    /// Creates an input block producing one image.
    pub fn new(
        prompt: impl Into<String>,
        ref_image: impl Into<String>,
        size: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            ref_image: ref_image.into(),
            size: size.into(),
            n: 1,
        }
    }
}

/// Generation parameters of an image synthesis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ImageSynthesisParameters {
    /// Provider style preset
    style: String,
    /// Random seed
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
}

impl ImageSynthesisParameters {
    /// Automatic style with the given seed.
    pub fn auto(seed: Option<u32>) -> Self {
        Self {
            style: "<auto>".to_string(),
            seed,
        }
    }
}

/// Image synthesis (outpainting) request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ImageSynthesisRequest {
    /// Model identifier
    model: String,
    /// Prompt and reference image
    input: ImageSynthesisInput,
    /// Generation parameters
    parameters: ImageSynthesisParameters,
}

impl ImageSynthesisRequest {
    /// Creates a new builder for `ImageSynthesisRequest`.
    pub fn builder() -> ImageSynthesisRequestBuilder {
        ImageSynthesisRequestBuilder::default()
    }
}

/// Input block of a speech request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SpeechInput {
    /// Text to speak
    text: String,
}

impl SpeechInput {
    /// Wraps `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Voice parameters of a speech request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct SpeechParameters {
    /// Voice identifier
    voice: String,
    /// Speaking rate multiplier
    speech_rate: f64,
    /// Pitch multiplier
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pitch_rate: Option<f64>,
    /// Volume (0-100)
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    volume: Option<u32>,
    /// Audio container
    #[builder(default = "\"mp3\".to_string()")]
    format: String,
}

impl SpeechParameters {
    /// Creates a new builder for `SpeechParameters`.
    pub fn builder() -> SpeechParametersBuilder {
        SpeechParametersBuilder::default()
    }
}

/// Speech synthesis request body, shared by the inline and asynchronous endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct SpeechRequest {
    /// Model identifier
    model: String,
    /// Text
    input: SpeechInput,
    /// Voice parameters
    parameters: SpeechParameters,
}

impl SpeechRequest {
    /// Assembles a request.
    pub fn new(model: impl Into<String>, input: SpeechInput, parameters: SpeechParameters) -> Self {
        Self {
            model: model.into(),
            input,
            parameters,
        }
    }
}

/// Task status as reported by DashScope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashScopeTaskStatus {
    /// Queued
    Pending,
    /// In progress
    Running,
    /// Finished with results
    Succeeded,
    /// Finished with an error
    Failed,
    /// Cancelled by the caller
    Canceled,
    /// Anything else, including `UNKNOWN`
    #[serde(other)]
    Unknown,
}

/// Response to a task submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct TaskSubmitResponse {
    /// Submission output
    #[serde(default)]
    output: TaskOutput,
    /// Request identifier for support tickets
    #[serde(default)]
    request_id: Option<String>,
}

/// One produced image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct TaskResult {
    /// Image URL
    #[serde(default)]
    url: Option<String>,
}

/// The `output` object shared by submission and query responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
pub struct TaskOutput {
    /// Task identifier
    #[serde(default)]
    task_id: Option<String>,
    /// Task status
    #[serde(default)]
    task_status: Option<DashScopeTaskStatus>,
    /// Image results
    #[serde(default)]
    results: Vec<TaskResult>,
    /// Synthesized audio location
    #[serde(default)]
    audio_address: Option<String>,
    /// Error code
    #[serde(default)]
    code: Option<String>,
    /// Error message
    #[serde(default)]
    message: Option<String>,
}

/// Response to `GET /tasks/{task_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct TaskQueryResponse {
    /// Task state
    #[serde(default)]
    output: TaskOutput,
    /// Request identifier
    #[serde(default)]
    request_id: Option<String>,
}

impl TaskQueryResponse {
    /// Reduces the response to a poll observation for a task of `kind`.
    ///
    /// A succeeded task without a usable result counts as failed.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyreel_core::{TaskKind, TaskPoll};
    /// use storyreel_models::TaskQueryResponse;
    ///
    /// let body = r#"{"output": {"task_status": "SUCCEEDED", "results": [{"url": "https://oss/a.png"}]}}"#;
    /// let response: TaskQueryResponse = serde_json::from_str(body).unwrap();
    /// assert_eq!(
    ///     response.into_poll(TaskKind::ExpandImage),
    ///     TaskPoll::Succeeded("https://oss/a.png".to_string())
    /// );
    /// ```
    pub fn into_poll(self, kind: TaskKind) -> TaskPoll {
        let output = self.output;
        match output.task_status.unwrap_or(DashScopeTaskStatus::Unknown) {
            DashScopeTaskStatus::Pending | DashScopeTaskStatus::Unknown => TaskPoll::Queued,
            DashScopeTaskStatus::Running => TaskPoll::Running,
            DashScopeTaskStatus::Succeeded => {
                let result = match kind {
                    TaskKind::ExpandImage => output.results.into_iter().find_map(|r| r.url),
                    TaskKind::SynthesizeVoice => output.audio_address,
                };
                match result {
                    Some(url) if !url.is_empty() => TaskPoll::Succeeded(url),
                    _ => TaskPoll::Failed(format!("task succeeded without a {kind} result")),
                }
            }
            DashScopeTaskStatus::Failed | DashScopeTaskStatus::Canceled => TaskPoll::Failed(
                output
                    .message
                    .or(output.code)
                    .unwrap_or_else(|| "unknown error".to_string()),
            ),
        }
    }
}
