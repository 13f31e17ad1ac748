//! Error types for the Storyreel pipeline.
//!
//! This crate provides the foundation error types used throughout the Storyreel workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Errors fall into two handling classes. [`RemoteTaskError`] is recoverable during
//! slide enrichment (the slide keeps its original image or stays silent). Every other
//! error aborts the job.
//!
//! # Examples
//!
//! ```
//! use storyreel_error::{StoryreelResult, ValidationError, ValidationErrorKind};
//!
//! fn check_title(title: &str) -> StoryreelResult<()> {
//!     if title.is_empty() {
//!         Err(ValidationError::new(ValidationErrorKind::Title(0)))?
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_title("").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod composition;
mod config;
mod error;
mod json;
mod pipeline;
mod provider;
mod remote_task;
mod storage;
mod validation;

pub use composition::{CompositionError, CompositionErrorKind};
pub use config::ConfigError;
pub use error::{StoryreelError, StoryreelErrorKind, StoryreelResult};
pub use json::JsonError;
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use provider::{ProviderError, ProviderErrorKind};
pub use remote_task::{RemoteTaskError, RemoteTaskErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};
