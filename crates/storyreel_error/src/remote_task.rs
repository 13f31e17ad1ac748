//! Errors raised while waiting on asynchronous provider tasks.

/// Outcomes of a remote task that did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RemoteTaskErrorKind {
    /// Provider reported the task as failed
    #[display("Remote task {} failed: {}", task_id, message)]
    Failed {
        /// Provider task identifier
        task_id: String,
        /// Message reported by the provider
        message: String,
    },
    /// Task did not settle within the polling budget
    #[display("Remote task {} still unresolved after {} polls", task_id, attempts)]
    Timeout {
        /// Provider task identifier
        task_id: String,
        /// Number of polls performed
        attempts: usize,
    },
}

/// Remote task error with location tracking.
///
/// # Examples
///
/// ```
/// use storyreel_error::{RemoteTaskError, RemoteTaskErrorKind};
///
/// let err = RemoteTaskError::new(RemoteTaskErrorKind::Failed {
///     task_id: "t-1".to_string(),
///     message: "content moderation".to_string(),
/// });
/// assert!(format!("{}", err).contains("content moderation"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Remote Task Error: {} at line {} in {}", kind, line, file)]
pub struct RemoteTaskError {
    /// The kind of error that occurred
    pub kind: RemoteTaskErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RemoteTaskError {
    /// Create a new remote task error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RemoteTaskErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// True when the task ran out of polls rather than failing outright.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, RemoteTaskErrorKind::Timeout { .. })
    }
}
