//! Job lifecycle errors.

/// Failures of the job state machine and its executor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Status change that would move backwards or leave a terminal state
    #[display("Invalid status transition from {} to {}", from, to)]
    InvalidTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },
    /// A single attempt exceeded the hard time ceiling
    #[display("Job {} exceeded its {}s time limit", job_id, limit_secs)]
    TimedOut {
        /// Job identifier
        job_id: String,
        /// Ceiling in seconds
        limit_secs: u64,
    },
    /// Status requested for a job the store has never seen
    #[display("Job not found: {}", _0)]
    JobNotFound(String),
    /// Worker pool shut down before the job could run
    #[display("Worker pool closed")]
    WorkersClosed,
    /// Job task ended without producing a result
    #[display("Job task aborted: {}", _0)]
    Aborted(String),
}

/// Pipeline error with location tracking.
///
/// # Examples
///
/// ```
/// use storyreel_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::JobNotFound("42".to_string()));
/// assert!(format!("{}", err).contains("42"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The kind of error that occurred
    pub kind: PipelineErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new pipeline error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
