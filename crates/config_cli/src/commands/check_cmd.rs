//! The `check` command.
//!
//! Reports every error an override has at a level and, optionally, the
//! warnings for the override treated as a complete config.
//!
//! # Examples
//!
//! ```bash
//! tenant-config check --level branch branch-override.json
//! tenant-config check --level environment --warnings env.json
//! ```

use std::path::PathBuf;

use clap::Args;
use config_manager::{
    get_config_override_errors, get_incomplete_config_warnings, ConfigLevel,
    OverrideCheckOptions, SchemaRegistry, ValidationError, ValidationWarning,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use super::{read_config, to_json, CommandOutput};
use crate::{config::AppConfig, errors::CliResult};

#[cfg(test)]
#[path = "check_cmd_tests.rs"]
mod tests;

/// Arguments for `check`.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Level the override is stored at
    #[arg(long)]
    pub level: ConfigLevel,

    /// JSON override to check
    pub file: PathBuf,

    /// Accept keys that an earlier level has already fixed
    #[arg(long)]
    pub allow_fixed: bool,

    /// Also report what the override is missing as a complete config
    #[arg(long)]
    pub warnings: bool,
}

/// Checks an override and returns a JSON report.
///
/// The command fails (without an error) if the override has errors, so
/// scripts can rely on the exit code.
#[instrument(skip_all, fields(level = %args.level, file = ?args.file))]
pub fn execute(args: &CheckArgs, app_config: &AppConfig) -> CliResult<CommandOutput> {
    let config = read_config(&args.file)?;
    let registry = SchemaRegistry::new()?;

    let options = OverrideCheckOptions {
        allow_properties_that_can_no_longer_be_overridden: args.allow_fixed,
    };
    let result = get_config_override_errors(&registry, args.level, &config, options)?;

    // Warnings need an override without errors
    let warnings = if args.warnings && result.is_valid() {
        get_incomplete_config_warnings(&registry, args.level, &config)?
    } else {
        Vec::new()
    };

    let report = json!({
        "level": args.level,
        "valid": result.is_valid(),
        "errors": result.errors.iter().map(error_to_json).collect::<Vec<_>>(),
        "warnings": warnings.iter().map(warning_to_json).collect::<Vec<_>>(),
    });
    let output = to_json(&report, app_config.output.pretty)?;

    if result.is_valid() {
        info!("Override is valid with {} warnings", warnings.len());
        Ok(CommandOutput::success(output))
    } else {
        warn!("Override has {} errors", result.errors.len());
        Ok(CommandOutput::failure(output))
    }
}

fn error_to_json(error: &ValidationError) -> Value {
    json!({
        "type": error.error_type.to_string(),
        "path": error.field_path,
        "message": error.message,
        "suggestion": error.suggestion,
    })
}

pub(crate) fn warning_to_json(warning: &ValidationWarning) -> Value {
    json!({
        "path": warning.field_path,
        "message": warning.message,
        "recommendation": warning.recommendation,
    })
}
