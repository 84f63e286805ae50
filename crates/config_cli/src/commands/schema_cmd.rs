//! The `schema` command.

use clap::Args;
use config_manager::{ConfigLevel, SchemaRegistry};
use tracing::{debug, instrument};

use super::{to_json, CommandOutput};
use crate::{config::AppConfig, errors::CliResult};

#[cfg(test)]
#[path = "schema_cmd_tests.rs"]
mod tests;

/// Arguments for `schema`.
#[derive(Args, Debug, Clone)]
pub struct SchemaArgs {
    /// Level whose schema to print
    #[arg(long)]
    pub level: ConfigLevel,

    /// Print the schema overrides are checked against instead of the full one
    #[arg(long = "override")]
    pub override_schema: bool,
}

#[instrument(skip_all, fields(level = %args.level))]
pub fn execute(args: &SchemaArgs, app_config: &AppConfig) -> CliResult<CommandOutput> {
    let registry = SchemaRegistry::new()?;
    let schema = if args.override_schema {
        registry.override_schema(args.level)
    } else {
        registry.json_schema(args.level)
    };
    debug!("Printing {} schema", args.level);

    Ok(CommandOutput::success(to_json(
        schema,
        app_config.output.pretty,
    )?))
}
