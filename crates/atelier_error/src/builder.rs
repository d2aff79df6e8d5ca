//! Builder-related errors.
//!
//! Builders generated with `derive_builder` in the other Atelier crates use
//! [`BuilderError`] as their build error, so a missing field surfaces with the
//! field name and the location of the failed `build()` call.

/// Specific builder error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BuilderErrorKind {
    /// A field without a default was never set
    #[display("Missing required field: {}", _0)]
    MissingField(String),

    /// A field was set to a value the type rejects
    #[display("Invalid field value for '{}': {}", field, reason)]
    InvalidField {
        /// The field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Builder error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Builder Error: {} at line {} in {}", kind, line, file)]
pub struct BuilderError {
    kind: BuilderErrorKind,
    line: u32,
    file: &'static str,
}

impl BuilderError {
    /// Create a new builder error with caller location tracking.
    #[track_caller]
    pub fn new(kind: BuilderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for [`BuilderErrorKind::InvalidField`].
    #[track_caller]
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(BuilderErrorKind::InvalidField {
            field: field.into(),
            reason: reason.into(),
        })
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BuilderErrorKind {
        &self.kind
    }
}

impl From<derive_builder::UninitializedFieldError> for BuilderError {
    #[track_caller]
    fn from(err: derive_builder::UninitializedFieldError) -> Self {
        Self::new(BuilderErrorKind::MissingField(err.field_name().to_string()))
    }
}
