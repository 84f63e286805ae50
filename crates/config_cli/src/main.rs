use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config_cli::{
    commands::{
        check_cmd::{self, CheckArgs},
        normalize_cmd::{self, NormalizeArgs},
        override_cmd::{self, OverrideArgs},
        resolve_cmd::{self, ResolveArgs},
        schema_cmd::{self, SchemaArgs},
        CommandOutput,
    },
    config::AppConfig,
    errors::CliResult,
};

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// tenant-config: Normalize, check and resolve tenant configuration overrides
#[derive(Parser, Debug)]
#[command(name = "tenant-config")]
#[command(about = "Normalize, check and resolve tenant configuration overrides", long_about = None)]
struct Cli {
    /// Path to the CLI settings file (defaults to ./tenant-config.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Expand dotted keys and nulls into a nested config
    Normalize(NormalizeArgs),

    /// Apply overrides on top of a base config
    Override(OverrideArgs),

    /// Check an override against a level's schema
    Check(CheckArgs),

    /// Resolve a chain of level overrides
    Resolve(ResolveArgs),

    /// Print the JSON schema of a level
    Schema(SchemaArgs),

    /// Show the CLI version
    Version,
}

fn run(cli: &Cli) -> CliResult<CommandOutput> {
    let app_config = AppConfig::load_or_default(cli.config.as_deref())?;

    match &cli.command {
        Commands::Normalize(args) => normalize_cmd::execute(args, &app_config),
        Commands::Override(args) => override_cmd::execute(args, &app_config),
        Commands::Check(args) => check_cmd::execute(args, &app_config),
        Commands::Resolve(args) => resolve_cmd::execute(args, &app_config),
        Commands::Schema(args) => schema_cmd::execute(args, &app_config),
        Commands::Version => Ok(CommandOutput::success(format!(
            "tenant-config version {}",
            option_env!("TENANT_CONFIG_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
        ))),
    }
}

fn main() {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("TENANT_CONFIG_LOG"))
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(result) => {
            println!("{}", result.output);
            std::process::exit(if result.success { 0 } else { 1 });
        }
        Err(e) => {
            error!("Error: {e}");
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    }
}
