//! Top-level error wrapper types.

use crate::{
    CompositionError, ConfigError, JsonError, PipelineError, ProviderError, RemoteTaskError,
    StorageError, ValidationError,
};

/// Every error the pipeline can surface.
///
/// # Examples
///
/// ```
/// use storyreel_error::{StoryreelError, ConfigError};
///
/// let err: StoryreelError = ConfigError::new("bad polling interval").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryreelErrorKind {
    /// Submission rejected before dispatch
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Remote task failed or timed out
    #[from(RemoteTaskError)]
    RemoteTask(RemoteTaskError),
    /// Transport or protocol failure against a provider
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Video composition failure
    #[from(CompositionError)]
    Composition(CompositionError),
    /// Storage failure
    #[from(StorageError)]
    Storage(StorageError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Job lifecycle error
    #[from(PipelineError)]
    Pipeline(PipelineError),
}

/// Storyreel error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyreel_error::{StoryreelResult, StorageError, StorageErrorKind};
///
/// fn upload() -> StoryreelResult<String> {
///     Err(StorageError::new(StorageErrorKind::Unavailable("disk full".into())))?
/// }
///
/// let err = upload().unwrap_err();
/// assert!(!err.is_validation());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyreel Error: {}", _0)]
pub struct StoryreelError(Box<StoryreelErrorKind>);

impl StoryreelError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryreelErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryreelErrorKind {
        &self.0
    }

    /// True for submission errors, which are never retried.
    pub fn is_validation(&self) -> bool {
        matches!(*self.0, StoryreelErrorKind::Validation(_))
    }

    /// True for failures of a remote task that enrichment can fall back from.
    pub fn is_remote_task(&self) -> bool {
        matches!(*self.0, StoryreelErrorKind::RemoteTask(_))
    }
}

// Generic From implementation for any type that converts to StoryreelErrorKind
impl<T> From<T> for StoryreelError
where
    T: Into<StoryreelErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Storyreel operations.
pub type StoryreelResult<T> = std::result::Result<T, StoryreelError>;
