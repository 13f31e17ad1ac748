//! Builds the production collaborators from configuration.

use std::sync::Arc;
use std::time::Duration;
use storyreel_compositor::{Compositor, FfmpegEncoder};
use storyreel_error::StoryreelResult;
use storyreel_models::{DashScopeClient, RemoteMediaClient};
use storyreel_pipeline::{InMemoryJobStore, JobExecutor, TracingProgressSink};
use storyreel_retry::StoryreelConfig;
use storyreel_storage::LocalStorage;

/// Job executor backed by DashScope, local storage and ffmpeg.
///
/// Progress is kept in an in-memory store and logged.
///
/// # Errors
///
/// Fails on invalid configuration, a missing API key, or an unusable upload directory.
#[tracing::instrument(skip(config), fields(provider = %config.provider.name))]
pub fn build_executor(config: &StoryreelConfig) -> StoryreelResult<JobExecutor> {
    config.validate()?;

    let storage = Arc::new(LocalStorage::with_download_timeout(
        &config.storage.upload_dir,
        config.storage.base_url.clone(),
        Duration::from_secs(config.storage.download_timeout_secs),
    )?);
    let provider = Arc::new(DashScopeClient::new(&config.provider)?);
    let generator = Arc::new(
        RemoteMediaClient::new(provider, storage.clone(), config.poll_policy())
            .with_sync_max_chars(config.provider.sync_tts_max_chars),
    );
    let encoder = Arc::new(FfmpegEncoder::from_config(&config.render));
    let compositor = Arc::new(Compositor::new(encoder, storage, &config.render.work_dir));
    let store = Arc::new(InMemoryJobStore::with_forward(Arc::new(TracingProgressSink)));

    tracing::info!(slots = config.workers.slots, "Job executor ready");
    Ok(JobExecutor::new(
        generator,
        compositor,
        store,
        config.job_retry_policy(),
        config.workers.slots,
    ))
}
