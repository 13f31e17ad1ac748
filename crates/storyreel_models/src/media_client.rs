//! Media generation on top of a submit-and-poll provider.

use crate::lookup::{estimate_speech_secs, expansion_prompt, voice_id};
use async_trait::async_trait;
use std::sync::Arc;
use storyreel_core::{
    ExpansionStyle, SynthesisRequest, SynthesisSubmission, SynthesizedVoice, TaskKind, VoiceType,
};
use storyreel_error::{ProviderError, ProviderErrorKind, StoryreelResult};
use storyreel_interface::{MediaGenerator, RemoteTaskProvider};
use storyreel_retry::PollPolicy;
use storyreel_storage::ObjectStorage;
use tracing::{info, instrument};
use uuid::Uuid;

/// Longest text, in characters, sent to the inline speech endpoint.
pub const SYNC_SPEECH_MAX_CHARS: usize = 300;

/// [`MediaGenerator`] backed by a [`RemoteTaskProvider`].
///
/// Synthesized audio is copied into storage as `tts_<uuid>.mp3` so the compositor
/// never depends on short-lived provider URLs.
#[derive(Clone)]
pub struct RemoteMediaClient {
    provider: Arc<dyn RemoteTaskProvider>,
    storage: Arc<dyn ObjectStorage>,
    poll: PollPolicy,
    sync_max_chars: usize,
}

impl RemoteMediaClient {
    /// Creates a client.
    pub fn new(
        provider: Arc<dyn RemoteTaskProvider>,
        storage: Arc<dyn ObjectStorage>,
        poll: PollPolicy,
    ) -> Self {
        Self {
            provider,
            storage,
            poll,
            sync_max_chars: SYNC_SPEECH_MAX_CHARS,
        }
    }

    /// Overrides the inline speech threshold.
    pub fn with_sync_max_chars(mut self, sync_max_chars: usize) -> Self {
        self.sync_max_chars = sync_max_chars;
        self
    }

    async fn wait(&self, task_id: String, kind: TaskKind) -> StoryreelResult<String> {
        let provider = self.provider.clone();
        let id = task_id.clone();
        self.poll
            .wait_for(&task_id, kind, move || {
                let provider = provider.clone();
                let id = id.clone();
                async move { provider.poll(kind, &id).await }
            })
            .await
    }
}

#[async_trait]
impl MediaGenerator for RemoteMediaClient {
    #[instrument(skip(self), fields(provider = self.provider.provider_name(), style = %style))]
    async fn expand_image(&self, image: &str, style: ExpansionStyle) -> StoryreelResult<String> {
        let prompt = expansion_prompt(style);
        let task_id = self.provider.submit_expand(image, &prompt).await?;
        let url = self.wait(task_id, TaskKind::ExpandImage).await?;
        info!(url = %url, "Image expanded");
        Ok(url)
    }

    #[instrument(skip(self, text), fields(provider = self.provider.provider_name(), chars = text.chars().count(), voice = %voice))]
    async fn synthesize_voice(
        &self,
        text: &str,
        voice: VoiceType,
        speed: f64,
    ) -> StoryreelResult<SynthesizedVoice> {
        let chars = text.chars().count();
        if text.trim().is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::Input(
                "Nothing to synthesize".to_string(),
            ))
            .into());
        }

        let request = SynthesisRequest::builder()
            .text(text)
            .voice_id(voice_id(voice))
            .speech_rate(speed)
            .prefer_sync(chars <= self.sync_max_chars)
            .build()
            .map_err(|e| ProviderError::new(ProviderErrorKind::Input(e.to_string())))?;

        let audio = match self.provider.submit_synthesize(&request).await? {
            SynthesisSubmission::Completed(audio) => audio,
            SynthesisSubmission::Submitted(task_id) => {
                let url = self.wait(task_id, TaskKind::SynthesizeVoice).await?;
                self.provider.fetch(&url).await?
            }
        };

        let name = format!("tts_{}.mp3", Uuid::new_v4());
        let url = self.storage.upload_bytes(&audio, &name).await?;
        let estimated = estimate_speech_secs(text);
        info!(url = %url, estimated_secs = estimated, "Voice synthesized");
        Ok(SynthesizedVoice::new(url, estimated))
    }
}
