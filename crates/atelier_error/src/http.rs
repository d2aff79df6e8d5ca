//! HTTP client setup errors.

/// Failure to prepare an HTTP client or request.
///
/// Failures of an issued generation call are [`GenerationError`]s instead;
/// this covers the plumbing before any call is made.
///
/// [`GenerationError`]: crate::GenerationError
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "HTTP Error: {}{} at line {} in {}",
    message,
    url.as_ref().map(|u| format!(" ({})", u)).unwrap_or_default(),
    line,
    file
)]
pub struct HttpError {
    /// What went wrong
    pub message: String,
    /// Endpoint involved, when known
    pub url: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl HttpError {
    /// Create an error at the caller's location.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_error::HttpError;
    ///
    /// let err = HttpError::new("Failed to build HTTP client");
    /// assert!(err.url.is_none());
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            url: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Attaches the endpoint URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}
