//! The `override` command.

use std::path::PathBuf;

use clap::Args;
use config_format::override_all;
use tracing::{info, instrument};

use super::{read_config, to_json, CommandOutput};
use crate::{config::AppConfig, errors::CliResult};

#[cfg(test)]
#[path = "override_cmd_tests.rs"]
mod tests;

/// Arguments for `override`.
#[derive(Args, Debug, Clone)]
pub struct OverrideArgs {
    /// JSON config to start from
    pub base: PathBuf,

    /// JSON overrides, applied in order
    #[arg(required = true)]
    pub overrides: Vec<PathBuf>,
}

/// Applies every override on top of the base and returns the result as JSON.
///
/// The result keeps dotted keys and nulls; run it through `normalize` to
/// get the nested form.
#[instrument(skip_all, fields(base = ?args.base, overrides = args.overrides.len()))]
pub fn execute(args: &OverrideArgs, app_config: &AppConfig) -> CliResult<CommandOutput> {
    let base = read_config(&args.base)?;
    let overrides = args
        .overrides
        .iter()
        .map(|path| read_config(path))
        .collect::<Result<Vec<_>, _>>()?;

    let merged = override_all(&base, &overrides)?;
    info!("Applied {} overrides", overrides.len());

    Ok(CommandOutput::success(to_json(
        &merged,
        app_config.output.pretty,
    )?))
}
