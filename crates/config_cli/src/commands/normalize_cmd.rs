//! The `normalize` command.

use std::path::PathBuf;

use clap::Args;
use config_format::{normalize, NormalizeOptions};
use tracing::{info, instrument};

use super::{read_config, to_json, with_policy_flags, CommandOutput, NonObjectPolicy, NullPolicy};
use crate::{config::AppConfig, errors::CliResult};

#[cfg(test)]
#[path = "normalize_cmd_tests.rs"]
mod tests;

/// Arguments for `normalize`.
#[derive(Args, Debug, Clone)]
pub struct NormalizeArgs {
    /// JSON config to normalize
    pub file: PathBuf,

    /// What to do with a dotted key whose parent is not an object
    #[arg(long, value_enum)]
    pub on_dot_into_non_object: Option<NonObjectPolicy>,

    /// What to do with a dotted key whose parent is missing or null
    #[arg(long, value_enum)]
    pub on_dot_into_null: Option<NullPolicy>,
}

/// Normalizes a config file and returns it as JSON.
///
/// Flags take precedence over the `[normalize]` settings, which take
/// precedence over the strict built-in policy.
#[instrument(skip_all, fields(file = ?args.file))]
pub fn execute(args: &NormalizeArgs, app_config: &AppConfig) -> CliResult<CommandOutput> {
    let config = read_config(&args.file)?;

    let options = with_policy_flags(
        app_config.normalize.unwrap_or_else(NormalizeOptions::new),
        args.on_dot_into_non_object,
        args.on_dot_into_null,
    );

    let normalized = normalize(&config, options)?;
    info!("Normalized {} keys into {}", config.len(), normalized.len());

    Ok(CommandOutput::success(to_json(
        &normalized,
        app_config.output.pretty,
    )?))
}
