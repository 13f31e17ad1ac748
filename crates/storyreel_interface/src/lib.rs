//! Collaborator traits for the Storyreel video pipeline.
//!
//! The pipeline talks to the outside world only through these traits, so every
//! collaborator is an explicit instance handed to the orchestrator.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{CompositionProgress, MediaGenerator, ProgressSink, RemoteTaskProvider};
