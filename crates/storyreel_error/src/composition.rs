//! Video composition errors.

/// Failures while building or encoding the video.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum CompositionErrorKind {
    /// Encoder ran and exited unsuccessfully
    #[display("Encoder failed during {}: {}", stage, diagnostic)]
    EncoderFailed {
        /// Step being encoded (e.g. "slide 2", "concat")
        stage: String,
        /// Tail of the encoder's diagnostic output
        diagnostic: String,
    },
    /// Encoder binary could not be started
    #[display("Encoder unavailable: {}", _0)]
    EncoderUnavailable(String),
    /// Clip too short to hold both fades
    #[display("Slide {} lasts {}s, which cannot fit a fade in and out", index, seconds)]
    ClipTooShort {
        /// Zero-based slide index
        index: usize,
        /// Slide duration
        seconds: u32,
    },
    /// Nothing to compose
    #[display("No slides to compose")]
    NoSlides,
    /// Encoder reported success but produced no file
    #[display("Encoder produced no output at {}", _0)]
    MissingOutput(String),
    /// Scratch file handling failed
    #[display("Scratch file error: {}", _0)]
    Io(String),
}

/// Composition error with location tracking.
///
/// # Examples
///
/// ```
/// use storyreel_error::{CompositionError, CompositionErrorKind};
///
/// let err = CompositionError::new(CompositionErrorKind::EncoderFailed {
///     stage: "concat".to_string(),
///     diagnostic: "Invalid data found when processing input".to_string(),
/// });
/// assert!(format!("{}", err).contains("concat"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Composition Error: {} at line {} in {}", kind, line, file)]
pub struct CompositionError {
    /// The kind of error that occurred
    pub kind: CompositionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CompositionError {
    /// Create a new composition error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CompositionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
