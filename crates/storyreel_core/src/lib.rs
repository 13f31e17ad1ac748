//! Core data types for the Storyreel video pipeline.
//!
//! This crate holds the submission model (slides and render configuration), the job
//! state machine, and the ephemeral records used while waiting on remote tasks.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod job;
mod slide;
mod submission;
mod task;

pub use config::{
    BackgroundMusic, ExpansionStyle, Resolution, SubtitlePosition, VideoConfig,
    VideoConfigBuilder, VoiceType,
};
pub use job::{Job, JobId, JobStatus, ProgressUpdate};
pub use slide::Slide;
pub use submission::{SlideSpec, VideoSubmission};
pub use task::{
    ExternalTask, SynthesisRequest, SynthesisRequestBuilder, SynthesisSubmission,
    SynthesizedVoice, TaskKind, TaskPoll, TaskStatus,
};
