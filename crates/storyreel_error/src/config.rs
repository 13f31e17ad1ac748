//! Configuration error types.

use std::fmt;

/// A configuration file, layer or value that Storyreel cannot run with.
///
/// `setting` holds the dotted key (`workers.slots`) when one value is at fault and is
/// empty when a whole layer failed to load.
#[derive(Debug, Clone, derive_more::Error)]
pub struct ConfigError {
    /// What is wrong
    pub message: String,
    /// Dotted key of the offending value, if any
    pub setting: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Error about configuration as a whole, such as an unreadable file.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self::located(None, message.into())
    }

    /// Error about the single value at `setting`.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyreel_error::ConfigError;
    ///
    /// let err = ConfigError::for_setting("polling.interval_ms", "must be positive");
    /// assert_eq!(err.setting.as_deref(), Some("polling.interval_ms"));
    /// assert!(err.to_string().starts_with("Configuration Error: polling.interval_ms must be positive"));
    /// ```
    #[track_caller]
    pub fn for_setting(setting: impl Into<String>, message: impl Into<String>) -> Self {
        Self::located(Some(setting.into()), message.into())
    }

    #[track_caller]
    fn located(setting: Option<String>, message: String) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message,
            setting,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration Error: ")?;
        if let Some(setting) = &self.setting {
            write!(f, "{setting} ")?;
        }
        write!(f, "{} at line {} in {}", self.message, self.line, self.file)
    }
}
