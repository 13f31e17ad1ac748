//! JSON error types.

/// A JSON document that could not be read or written.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error in {}: {} at line {} in {}", document, message, line, file)]
pub struct JsonError {
    /// Which document was being handled ("submission", "voice catalog")
    pub document: &'static str,
    /// Parser or serializer message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Error while handling `document`.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyreel_error::JsonError;
    ///
    /// let err = JsonError::new("submission", "missing field `slides`");
    /// assert!(err.to_string().starts_with("JSON Error in submission: missing field `slides`"));
    /// ```
    #[track_caller]
    pub fn new(document: &'static str, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            document,
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
