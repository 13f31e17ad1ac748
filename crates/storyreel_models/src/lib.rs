//! Remote media providers for Storyreel.
//!
//! [`DashScopeClient`] speaks the DashScope (Alibaba Bailian) submit-and-poll protocol
//! for image outpainting and speech synthesis. [`RemoteMediaClient`] turns any
//! [`RemoteTaskProvider`](storyreel_interface::RemoteTaskProvider) into the
//! [`MediaGenerator`](storyreel_interface::MediaGenerator) the pipeline consumes:
//! it picks prompts and voices, waits on tasks with a bounded poll, and stores the
//! resulting audio.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use storyreel_core::{ExpansionStyle, VoiceType};
//! use storyreel_interface::MediaGenerator;
//! use storyreel_models::{DashScopeClient, RemoteMediaClient};
//! use storyreel_retry::StoryreelConfig;
//! use storyreel_storage::LocalStorage;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StoryreelConfig::load()?;
//! let provider = Arc::new(DashScopeClient::new(&config.provider)?);
//! let storage = Arc::new(LocalStorage::new("./uploads", "http://localhost:8000")?);
//! let client = RemoteMediaClient::new(provider, storage, config.poll_policy());
//!
//! let wide = client.expand_image("https://example.com/cat.jpg", ExpansionStyle::Dreamy).await?;
//! let voice = client.synthesize_voice("你好", VoiceType::Child, 1.0).await?;
//! println!("{wide} {}", voice.url());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod dashscope;
mod lookup;
mod media_client;

pub use dashscope::{
    DashScopeClient, DashScopeTaskStatus, ImageSynthesisInput, ImageSynthesisParameters,
    ImageSynthesisRequest, ImageSynthesisRequestBuilder, SpeechInput, SpeechParameters,
    SpeechParametersBuilder, SpeechRequest, TaskOutput, TaskQueryResponse, TaskResult,
    TaskSubmitResponse,
};
pub use lookup::{
    VoiceInfo, estimate_speech_secs, expansion_prompt, style_prompt, voice_catalog, voice_id,
};
pub use media_client::{RemoteMediaClient, SYNC_SPEECH_MAX_CHARS};
