//! Configuration loading and validation errors.

/// Configuration that could not be loaded or failed validation.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Configuration Error: {}{} at line {} in {}",
    key.as_ref().map(|k| format!("{}: ", k)).unwrap_or_default(),
    message,
    line,
    file
)]
pub struct ConfigError {
    /// Dotted key of the offending value, for validation failures
    pub key: Option<String>,
    /// What went wrong
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// A loading or parsing failure.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            key: None,
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// A validation failure for one key.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_error::ConfigError;
    ///
    /// let err = ConfigError::invalid("polling.max_attempts", "must be at least 1");
    /// assert!(err.to_string().contains("polling.max_attempts: must be at least 1"));
    /// ```
    #[track_caller]
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            key: Some(key.into()),
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
