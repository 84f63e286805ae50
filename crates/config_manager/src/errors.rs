//! Configuration system error types.
//!
//! Domain-specific errors for schema generation, override checking, and
//! level resolution.

use crate::hierarchy::ConfigLevel;
use config_format::FormatError;
use thiserror::Error;

/// Configuration system errors.
///
/// Errors raised by the format engine pass through unchanged as
/// [`ConfigurationError::Format`]; everything else concerns the schema layer
/// stack built on top of it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Config override rejected at {level} level: {reason}")]
    OverrideRejected { level: ConfigLevel, reason: String },

    #[error("Failed to build schema for {level} level: {reason}")]
    SchemaCompilation { level: ConfigLevel, reason: String },

    #[error("Config does not match the {level} schema: {reason}")]
    SchemaViolation { level: ConfigLevel, reason: String },

    #[error("Failed to migrate {level} override: {reason}")]
    Migration { level: ConfigLevel, reason: String },

    /// A condition that earlier validation should have ruled out.
    #[error("Internal invariant violated: {message}")]
    InvariantViolation { message: String },
}

impl ConfigurationError {
    /// Returns true if the underlying failure is a normalization error.
    pub fn is_normalization(&self) -> bool {
        matches!(self, ConfigurationError::Format(error) if error.is_normalization())
    }
}

/// Result type alias for configuration operations.
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
