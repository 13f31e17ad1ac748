//! Submission validation errors.

/// Reasons a job submission is rejected before dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ValidationErrorKind {
    /// Title length (in characters) outside 1-100
    #[display("Title must be 1-100 characters, got {}", _0)]
    Title(usize),
    /// Slide count outside 1-20
    #[display("A video needs 1-20 slides, got {}", _0)]
    SlideCount(usize),
    /// Slide duration outside 2-30 seconds
    #[display("Slide {} duration must be 2-30 seconds, got {}", index, seconds)]
    SlideDuration {
        /// Zero-based slide index
        index: usize,
        /// Requested duration
        seconds: u32,
    },
    /// Slide without a source image
    #[display("Slide {} has no image", _0)]
    MissingImage(usize),
    /// Voice speed outside 0.5-2.0
    #[display("Voice speed must be between 0.5 and 2.0, got {}", _0)]
    VoiceSpeed(String),
    /// Frame rate outside 1-60
    #[display("Frame rate must be 1-60, got {}", _0)]
    FrameRate(u32),
    /// Value not recognized for a strict enumeration
    #[display("Unknown {} '{}'", field, value)]
    UnknownValue {
        /// Field being parsed
        field: String,
        /// Rejected value
        value: String,
    },
}

/// Validation error with location tracking.
///
/// # Examples
///
/// ```
/// use storyreel_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::SlideCount(21));
/// assert!(format!("{}", err).contains("1-20 slides"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The kind of error that occurred
    pub kind: ValidationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new validation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
