//! DashScope HTTP client.

use crate::dashscope::{
    ImageSynthesisInput, ImageSynthesisParameters, ImageSynthesisRequest, SpeechInput,
    SpeechParameters, SpeechRequest, TaskQueryResponse, TaskSubmitResponse,
};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::{Client, Response};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use storyreel_core::{SynthesisRequest, SynthesisSubmission, TaskKind, TaskPoll};
use storyreel_error::{ProviderError, ProviderErrorKind, StoryreelResult};
use storyreel_interface::RemoteTaskProvider;
use storyreel_retry::{ProviderConfig, RequestLimiter};
use tracing::{debug, info, instrument};
use uuid::Uuid;

const IMAGE_SYNTHESIS_PATH: &str = "/services/aigc/text2image/image-synthesis";
const SPEECH_PATH: &str = "/services/aigc/tts";
const SPEECH_ASYNC_PATH: &str = "/services/aigc/tts/async";

/// DashScope client for image outpainting and speech synthesis.
#[derive(Debug, Clone)]
pub struct DashScopeClient {
    client: Client,
    api_key: String,
    base_url: String,
    image_model: String,
    image_size: String,
    tts_model: String,
    limiter: RequestLimiter,
}

impl DashScopeClient {
    /// Creates a client, reading the API key from the variable named by
    /// `config.api_key_env`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The API key is not set in the environment
    /// - The HTTP client cannot be initialized
    #[instrument(skip_all, fields(base_url = %config.base_url))]
    pub fn new(config: &ProviderConfig) -> StoryreelResult<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            ProviderError::new(ProviderErrorKind::MissingApiKey(config.api_key_env.clone()))
        })?;
        Self::with_api_key(api_key, config)
    }

    /// Creates a client with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    #[instrument(skip_all)]
    pub fn with_api_key(api_key: impl Into<String>, config: &ProviderConfig) -> StoryreelResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ProviderError::new(ProviderErrorKind::ClientCreation(e.to_string())))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_model: config.image_model.clone(),
            image_size: config.image_size.clone(),
            tts_model: config.tts_model.clone(),
            limiter: RequestLimiter::per_minute(config.requests_per_minute),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a JSON body and fails on non-success status.
    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        asynchronous: bool,
    ) -> StoryreelResult<Response> {
        self.limiter.acquire().await;

        let mut request = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .json(body);
        if asynchronous {
            request = request.header("X-DashScope-Async", "enable");
        }

        let response = request.send().await.map_err(|e| {
            ProviderError::new(ProviderErrorKind::Request(format!("Request failed: {}", e)))
        })?;
        Self::check_status(response).await
    }

    async fn check_status(response: Response) -> StoryreelResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status_code = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        Err(ProviderError::new(ProviderErrorKind::Http {
            status_code,
            message,
        })
        .into())
    }

    async fn submitted_task_id(response: Response) -> StoryreelResult<String> {
        let body: TaskSubmitResponse = response.json().await.map_err(|e| {
            ProviderError::new(ProviderErrorKind::Decode(format!(
                "Failed to parse submission: {}",
                e
            )))
        })?;
        body.output().task_id().clone().ok_or_else(|| {
            ProviderError::new(ProviderErrorKind::Decode(
                "Submission response has no task_id".to_string(),
            ))
            .into()
        })
    }

    /// Remote images are passed by URL; local files are inlined as base64.
    async fn reference_image(image: &str) -> StoryreelResult<String> {
        if image.starts_with("http://") || image.starts_with("https://") || image.starts_with("data:") {
            return Ok(image.to_string());
        }
        let data = tokio::fs::read(Path::new(image)).await.map_err(|e| {
            ProviderError::new(ProviderErrorKind::Input(format!("{}: {}", image, e)))
        })?;
        Ok(BASE64.encode(data))
    }
}

#[async_trait]
impl RemoteTaskProvider for DashScopeClient {
    fn provider_name(&self) -> &'static str {
        "dashscope"
    }

    #[instrument(skip(self, style_prompt), fields(model = %self.image_model))]
    async fn submit_expand(&self, image: &str, style_prompt: &str) -> StoryreelResult<String> {
        let seed = (Uuid::new_v4().as_u128() % 1_000_000) as u32;
        let request = ImageSynthesisRequest::builder()
            .model(self.image_model.clone())
            .input(ImageSynthesisInput::new(
                style_prompt,
                Self::reference_image(image).await?,
                self.image_size.clone(),
            ))
            .parameters(ImageSynthesisParameters::auto(Some(seed)))
            .build()
            .map_err(|e| ProviderError::new(ProviderErrorKind::Input(e.to_string())))?;

        let response = self.post_json(IMAGE_SYNTHESIS_PATH, &request, true).await?;
        let task_id = Self::submitted_task_id(response).await?;
        info!(task_id = %task_id, "Submitted image expansion");
        Ok(task_id)
    }

    #[instrument(skip(self, request), fields(model = %self.tts_model, chars = request.text().chars().count(), sync = request.prefer_sync()))]
    async fn submit_synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> StoryreelResult<SynthesisSubmission> {
        let sync = *request.prefer_sync();
        let mut parameters = SpeechParameters::builder();
        parameters
            .voice(request.voice_id().clone())
            .speech_rate(*request.speech_rate());
        if sync {
            parameters.pitch_rate(Some(1.0)).volume(Some(50u32));
        }
        let parameters = parameters
            .build()
            .map_err(|e| ProviderError::new(ProviderErrorKind::Input(e.to_string())))?;
        let body = SpeechRequest::new(
            self.tts_model.clone(),
            SpeechInput::new(request.text().clone()),
            parameters,
        );

        if sync {
            let response = self.post_json(SPEECH_PATH, &body, false).await?;
            let audio = response.bytes().await.map_err(|e| {
                ProviderError::new(ProviderErrorKind::Decode(format!(
                    "Failed to read audio: {}",
                    e
                )))
            })?;
            debug!(bytes = audio.len(), "Received inline speech");
            Ok(SynthesisSubmission::Completed(audio.to_vec()))
        } else {
            let response = self.post_json(SPEECH_ASYNC_PATH, &body, true).await?;
            let task_id = Self::submitted_task_id(response).await?;
            info!(task_id = %task_id, "Submitted speech synthesis");
            Ok(SynthesisSubmission::Submitted(task_id))
        }
    }

    #[instrument(skip(self), fields(kind = %kind))]
    async fn poll(&self, kind: TaskKind, task_id: &str) -> StoryreelResult<TaskPoll> {
        self.limiter.acquire().await;

        let response = self
            .client
            .get(self.url(&format!("/tasks/{}", task_id)))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
                ProviderError::new(ProviderErrorKind::Request(format!("Request failed: {}", e)))
            })?;
        let response = Self::check_status(response).await?;

        let body: TaskQueryResponse = response.json().await.map_err(|e| {
            ProviderError::new(ProviderErrorKind::Decode(format!(
                "Failed to parse task status: {}",
                e
            )))
        })?;
        let poll = body.into_poll(kind);
        debug!(status = %poll.status(), "Polled task");
        Ok(poll)
    }

    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> StoryreelResult<Vec<u8>> {
        let response = self.client.get(url).send().await.map_err(|e| {
            ProviderError::new(ProviderErrorKind::Request(format!("Download failed: {}", e)))
        })?;
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await.map_err(|e| {
            ProviderError::new(ProviderErrorKind::Decode(format!(
                "Failed to read download: {}",
                e
            )))
        })?;
        Ok(bytes.to_vec())
    }
}
