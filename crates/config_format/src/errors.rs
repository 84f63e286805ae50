//! Error types for the configuration format engine.
//!
//! Three kinds of failure are kept apart:
//!
//! - structural validation failures are reported as reason strings by
//!   [`crate::validation::get_invalid_config_reason`] and only become a
//!   [`FormatError::InvalidConfig`] when a caller asserts validity;
//! - [`NormalizationError`] is the user-input-shaped failure raised by
//!   [`crate::normalize::normalize`] under a throwing policy;
//! - [`FormatError::InvariantViolation`] covers everything that should be
//!   impossible once the input passed validation.

use thiserror::Error;

/// Errors raised by the override engine and the normalizer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// A config that was asserted to be structurally valid is not.
    ///
    /// This indicates a bug upstream (for example in a migration step), never
    /// an ordinary user mistake.
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// A dot-notation path could not be resolved under the active policy.
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    /// A condition that validation should have ruled out.
    #[error("Internal invariant violated: {message}")]
    InvariantViolation { message: String },
}

impl FormatError {
    /// Returns true if this error is a normalization failure.
    pub fn is_normalization(&self) -> bool {
        matches!(self, FormatError::Normalization(_))
    }
}

/// Failure to expand a dot-notation key into nested structure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizationError {
    #[error("Tried to use dot notation to access {key:?}, but {segment:?} doesn't exist on the object (or is null). Maybe this config is not normalizable?")]
    DotIntoMissing { key: String, segment: String },

    #[error("Tried to use dot notation to access {key:?}, but {segment:?} is not an object. Maybe this config is not normalizable?")]
    DotIntoNonObject { key: String, segment: String },

    #[error("Tried to use dot notation to access {key:?}, but {segment:?} is not a valid index into the array. Maybe this config is not normalizable?")]
    InvalidArrayIndex { key: String, segment: String },

    #[error("Tried to normalize a null value")]
    NullValue,
}

/// Result type alias for format engine operations.
pub type FormatResult<T> = Result<T, FormatError>;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
