//! Illegal lifecycle transition errors.

/// A request was asked to move between two statuses the lifecycle forbids.
///
/// # Examples
///
/// ```
/// use atelier_error::TransitionError;
///
/// let err = TransitionError::new("Idle", "Polling");
/// assert!(err.to_string().contains("Idle -> Polling"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Illegal transition {} -> {} at line {} in {}", from, to, line, file)]
pub struct TransitionError {
    /// Status the request was in
    pub from: String,
    /// Status that was requested
    pub to: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl TransitionError {
    /// Create a new TransitionError at the current location.
    #[track_caller]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            from: from.into(),
            to: to.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
