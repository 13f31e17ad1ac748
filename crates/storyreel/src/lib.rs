//! Storyreel - narrated slideshow videos.
//!
//! Storyreel turns an ordered list of slides (image, caption, narration text) into one
//! narrated video. Slide images can be outpainted to widescreen and narration is
//! synthesized by a remote AI provider; ffmpeg renders and joins the clips.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use storyreel::{StoryreelConfig, VideoSubmission, build_executor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoryreelConfig::load()?;
//!     let executor = build_executor(&config)?;
//!
//!     let submission = VideoSubmission::from_json(&std::fs::read_to_string("trip.json")?)?;
//!     let ticket = executor.submit(submission).await?;
//!     println!("{}", ticket.wait().await?.url());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Storyreel is organized as a workspace with focused crates:
//!
//! - `storyreel_error` - Error types
//! - `storyreel_core` - Submissions, slides, the job state machine
//! - `storyreel_interface` - Collaborator traits
//! - `storyreel_retry` - Configuration, polling and job retry policy
//! - `storyreel_storage` - Object storage
//! - `storyreel_models` - DashScope provider and media client
//! - `storyreel_compositor` - Clip rendering and concatenation
//! - `storyreel_pipeline` - Enrichment, orchestration and job execution
//!
//! This crate (`storyreel`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod telemetry;
mod wiring;

pub use storyreel_compositor::*;
pub use storyreel_core::*;
pub use storyreel_error::*;
pub use storyreel_interface::*;
pub use storyreel_models::*;
pub use storyreel_pipeline::*;
pub use storyreel_retry::*;
pub use storyreel_storage::{LocalStorage, ObjectStorage};

pub use telemetry::{LogFormat, init_tracing};
pub use wiring::build_executor;
