//! Generation lifecycle errors.
//!
//! Every way a generation request can end in `Failed` is a
//! [`GenerationErrorKind`]. The kinds group into four [`FailureCategory`]
//! values so callers can tell a timed-out job (which may still be running
//! server-side) apart from one the service rejected.

/// Coarse failure classes shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum FailureCategory {
    /// Checks before any network call failed
    #[display("preflight")]
    Preflight,
    /// The service could not be reached
    #[display("transport")]
    Transport,
    /// The service answered with a failure
    #[display("remote")]
    Remote,
    /// Polling ran out of attempts
    #[display("timeout")]
    Timeout,
}

/// Reasons a submission is refused before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PreflightFailure {
    /// No signed-in user, or the session is still loading
    #[display("Please log in to use generation features")]
    NotAuthenticated,

    /// Balance below the node kind's cost
    #[display("You need at least {} credit(s) to generate, {} available", required, available)]
    InsufficientCredits {
        /// Credits the node kind costs
        required: u32,
        /// Credits currently available
        available: u32,
    },

    /// Required input missing (empty prompt, too few images)
    #[display("{}", _0)]
    IncompleteInput(String),

    /// More inputs than the node has slots for
    #[display("At most {} inputs are supported, {} provided", max, provided)]
    TooManyInputs {
        /// Slot capacity
        max: usize,
        /// Inputs supplied
        provided: usize,
    },

    /// Credits collaborator declined the debit
    #[display("Credits could not be used for this generation")]
    DebitRefused,
}

/// Specific generation failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GenerationErrorKind {
    /// Pre-flight check failed; no request was sent
    #[display("Preflight failed: {}", _0)]
    Preflight(PreflightFailure),

    /// Network/connectivity failure while submitting or polling
    #[display("Transport failure: {}", _0)]
    Transport(String),

    /// Service responded with an explicit failure or unusable body
    #[display("Remote failure{}: {}", status.as_ref().map(|s| format!(" (HTTP {})", s)).unwrap_or_default(), message)]
    Remote {
        /// HTTP status when the failure came from a non-success response
        status: Option<u16>,
        /// Server-provided message, or a generic fallback
        message: String,
    },

    /// Polling exhausted its attempts without a terminal status
    #[display("Generation timed out after {} status checks", attempts)]
    Timeout {
        /// Number of status checks issued
        attempts: u32,
    },
}

impl GenerationErrorKind {
    /// Failure class for this kind.
    pub fn category(&self) -> FailureCategory {
        match self {
            GenerationErrorKind::Preflight(_) => FailureCategory::Preflight,
            GenerationErrorKind::Transport(_) => FailureCategory::Transport,
            GenerationErrorKind::Remote { .. } => FailureCategory::Remote,
            GenerationErrorKind::Timeout { .. } => FailureCategory::Timeout,
        }
    }

    /// Message suitable for display on a node.
    ///
    /// Transport details stay in the logs; users get a generic message.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_error::GenerationErrorKind;
    ///
    /// let kind = GenerationErrorKind::Remote {
    ///     status: Some(402),
    ///     message: "Quota exceeded".to_string(),
    /// };
    /// assert_eq!(kind.user_message(), "Quota exceeded");
    /// ```
    pub fn user_message(&self) -> String {
        match self {
            GenerationErrorKind::Preflight(reason) => reason.to_string(),
            GenerationErrorKind::Transport(_) => {
                "Could not reach the generation service. Please try again.".to_string()
            }
            GenerationErrorKind::Remote { message, .. } => message.clone(),
            GenerationErrorKind::Timeout { .. } => {
                "Generation timed out. The job may still be running.".to_string()
            }
        }
    }
}

impl From<PreflightFailure> for GenerationErrorKind {
    fn from(reason: PreflightFailure) -> Self {
        GenerationErrorKind::Preflight(reason)
    }
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use atelier_error::{FailureCategory, GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::Timeout { attempts: 30 });
/// assert_eq!(err.category(), FailureCategory::Timeout);
/// assert!(format!("{}", err).contains("30 status checks"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of failure
    pub kind: GenerationErrorKind,
    /// Line number where the error was created
    pub line: u32,
    /// File where the error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a transport failure.
    #[track_caller]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Transport(message.into()))
    }

    /// Shorthand for a remote failure.
    #[track_caller]
    pub fn remote(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Remote {
            status,
            message: message.into(),
        })
    }

    /// Failure class of the wrapped kind.
    pub fn category(&self) -> FailureCategory {
        self.kind.category()
    }
}

impl From<PreflightFailure> for GenerationError {
    #[track_caller]
    fn from(reason: PreflightFailure) -> Self {
        Self::new(GenerationErrorKind::Preflight(reason))
    }
}

/// Result type for generation lifecycle operations.
pub type GenerationResult<T> = Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_follow_kinds() {
        assert_eq!(
            GenerationErrorKind::Preflight(PreflightFailure::NotAuthenticated).category(),
            FailureCategory::Preflight
        );
        assert_eq!(
            GenerationErrorKind::Transport("reset".into()).category(),
            FailureCategory::Transport
        );
        assert_eq!(
            GenerationErrorKind::Remote {
                status: None,
                message: "bad".into()
            }
            .category(),
            FailureCategory::Remote
        );
        assert_eq!(
            GenerationErrorKind::Timeout { attempts: 3 }.category(),
            FailureCategory::Timeout
        );
    }

    #[test]
    fn transport_message_is_generic() {
        let kind = GenerationErrorKind::Transport("dns error: no such host".into());
        assert!(!kind.user_message().contains("dns"));
    }

    #[test]
    fn remote_display_includes_status_when_known() {
        let with_status = GenerationErrorKind::Remote {
            status: Some(500),
            message: "boom".into(),
        };
        let without_status = GenerationErrorKind::Remote {
            status: None,
            message: "boom".into(),
        };
        assert_eq!(with_status.to_string(), "Remote failure (HTTP 500): boom");
        assert_eq!(without_status.to_string(), "Remote failure: boom");
    }

    #[test]
    fn insufficient_credits_message_names_amounts() {
        let reason = PreflightFailure::InsufficientCredits {
            required: 2,
            available: 1,
        };
        assert_eq!(
            reason.to_string(),
            "You need at least 2 credit(s) to generate, 1 available"
        );
    }
}
