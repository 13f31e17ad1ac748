//! Job pipeline for Storyreel.
//!
//! A submitted video moves through enrichment and composition:
//!
//! - [`SlideEnricher`] adds outpainted images and narration slide by slide, falling
//!   back to the original image or silence when a remote task fails.
//! - [`PipelineOrchestrator`] drives the job state machine and publishes progress
//!   through a [`ProgressSink`](storyreel_interface::ProgressSink).
//! - [`JobExecutor`] validates submissions, runs jobs on a fixed pool of worker
//!   slots, and retries whole jobs.
//! - [`InMemoryJobStore`] answers status queries.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use storyreel_compositor::{Compositor, FfmpegEncoder};
//! use storyreel_core::{SlideSpec, VideoConfig, VideoSubmission};
//! use storyreel_models::{DashScopeClient, RemoteMediaClient};
//! use storyreel_pipeline::{InMemoryJobStore, JobExecutor};
//! use storyreel_retry::StoryreelConfig;
//! use storyreel_storage::LocalStorage;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StoryreelConfig::load()?;
//! let storage = Arc::new(LocalStorage::new(&config.storage.upload_dir, config.storage.base_url.clone())?);
//! let provider = Arc::new(DashScopeClient::new(&config.provider)?);
//! let generator = Arc::new(RemoteMediaClient::new(provider, storage.clone(), config.poll_policy()));
//! let encoder = Arc::new(FfmpegEncoder::from_config(&config.render));
//! let compositor = Arc::new(Compositor::new(encoder, storage, &config.render.work_dir));
//!
//! let executor = JobExecutor::new(
//!     generator,
//!     compositor,
//!     Arc::new(InMemoryJobStore::new()),
//!     config.job_retry_policy(),
//!     config.workers.slots,
//! );
//! let ticket = executor
//!     .submit(VideoSubmission {
//!         title: "Holiday".to_string(),
//!         description: String::new(),
//!         slides: vec![SlideSpec::new("https://example.com/beach.jpg")],
//!         config: VideoConfig::default(),
//!     })
//!     .await?;
//! let video = ticket.wait().await?;
//! println!("{}", video.url());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod enricher;
mod executor;
mod orchestrator;
mod progress;

pub use enricher::{EnrichmentReport, EnrichmentStage, SlideEnricher};
pub use executor::{JobExecutor, JobTicket};
pub use orchestrator::PipelineOrchestrator;
pub use progress::{InMemoryJobStore, ProgressBand, TracingProgressSink};
