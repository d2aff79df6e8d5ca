//! Top-level error wrapper types.

use crate::{BuilderError, ConfigError, GenerationError, HttpError, TransitionError};

/// Every error an Atelier crate can return.
///
/// # Examples
///
/// ```
/// use atelier_error::{AtelierError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: AtelierError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum AtelierErrorKind {
    /// HTTP client setup error
    #[from(HttpError)]
    Http(HttpError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Generation lifecycle failure
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Illegal request status transition
    #[from(TransitionError)]
    Transition(TransitionError),
}

/// Atelier error with kind discrimination.
///
/// # Examples
///
/// ```
/// use atelier_error::{AtelierResult, ConfigError};
///
/// fn might_fail() -> AtelierResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Atelier Error: {}", _0)]
pub struct AtelierError(Box<AtelierErrorKind>);

impl AtelierError {
    /// Create a new error from a kind.
    pub fn new(kind: AtelierErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AtelierErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to AtelierErrorKind
impl<T> From<T> for AtelierError
where
    T: Into<AtelierErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Atelier operations.
pub type AtelierResult<T> = std::result::Result<T, AtelierError>;
