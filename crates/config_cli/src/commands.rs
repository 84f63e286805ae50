//! Command modules for the tenant-config CLI.
//!
//! - `normalize_cmd`: expand a config into its nested form
//! - `override_cmd`: layer overrides on top of a base config
//! - `check_cmd`: check an override against a level's schema
//! - `resolve_cmd`: run the full resolution pipeline for a chain of levels
//! - `schema_cmd`: print a level's JSON schema
//!
//! Commands return their output instead of printing it, so they can be
//! tested without capturing stdout.

use std::{fs, path::Path};

use clap::ValueEnum;
use config_format::{Config, DotIntoNonObject, DotIntoNull, NormalizeOptions};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::{CliResult, Error};

pub mod check_cmd;
pub mod normalize_cmd;
pub mod override_cmd;
pub mod resolve_cmd;
pub mod schema_cmd;

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

/// The result of running a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Text to print on stdout.
    pub output: String,
    /// False if the command ran but found problems, e.g. a rejected override.
    pub success: bool,
}

impl CommandOutput {
    pub fn success(output: String) -> Self {
        Self {
            output,
            success: true,
        }
    }

    pub fn failure(output: String) -> Self {
        Self {
            output,
            success: false,
        }
    }
}

/// Command-line spelling of [`DotIntoNonObject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NonObjectPolicy {
    Throw,
    Ignore,
}

impl From<NonObjectPolicy> for DotIntoNonObject {
    fn from(policy: NonObjectPolicy) -> Self {
        match policy {
            NonObjectPolicy::Throw => DotIntoNonObject::Throw,
            NonObjectPolicy::Ignore => DotIntoNonObject::Ignore,
        }
    }
}

/// Command-line spelling of [`DotIntoNull`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NullPolicy {
    LikeNonObject,
    Throw,
    Ignore,
    EmptyObject,
}

impl From<NullPolicy> for DotIntoNull {
    fn from(policy: NullPolicy) -> Self {
        match policy {
            NullPolicy::LikeNonObject => DotIntoNull::LikeNonObject,
            NullPolicy::Throw => DotIntoNull::Throw,
            NullPolicy::Ignore => DotIntoNull::Ignore,
            NullPolicy::EmptyObject => DotIntoNull::EmptyObject,
        }
    }
}

/// Applies policy flags on top of `base`.
pub fn with_policy_flags(
    base: NormalizeOptions,
    on_dot_into_non_object: Option<NonObjectPolicy>,
    on_dot_into_null: Option<NullPolicy>,
) -> NormalizeOptions {
    let mut options = base;
    if let Some(policy) = on_dot_into_non_object {
        options = options.with_dot_into_non_object(policy.into());
    }
    if let Some(policy) = on_dot_into_null {
        options = options.with_dot_into_null(policy.into());
    }
    options
}

/// Reads a JSON document from disk.
pub fn read_json(path: &Path) -> CliResult<Value> {
    debug!("Reading {:?}", path);
    let content = fs::read_to_string(path).map_err(|source| Error::LoadFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| Error::ParseJsonFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a config document from disk.
///
/// # Errors
///
/// Returns `Error::LoadFile` or `Error::ParseJsonFile` if the file cannot be
/// read as JSON, and `Error::Format` if the JSON is not a valid config.
pub fn read_config(path: &Path) -> CliResult<Config> {
    let value = read_json(path)?;
    Ok(Config::try_from(value)?)
}

/// Serializes command output as JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> CliResult<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
