use std::{io, path::PathBuf};

use config_format::FormatError;
use config_manager::ConfigurationError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the tenant-config CLI.
///
/// Library failures pass through with their own message; the remaining
/// variants cover files, arguments and the CLI's own settings.
#[derive(Error, Debug)]
pub enum Error {
    /// Error loading or parsing the CLI's own TOML settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid or incompatible command-line arguments.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// A config document could not be read from disk.
    #[error("Failed to load file {path:?}: {source}")]
    LoadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A config document is not valid JSON.
    #[error("Failed to parse JSON in {path:?}: {source}")]
    ParseJsonFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Output could not be serialized.
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The format engine rejected a config.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Schema checking or level resolution failed.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, Error>;
