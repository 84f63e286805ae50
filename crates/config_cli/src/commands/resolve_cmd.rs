//! The `resolve` command.
//!
//! Runs stored overrides through the full resolution pipeline and prints the
//! resolved config of one level, or a report for every level up to it.
//!
//! # Examples
//!
//! ```bash
//! # Resolved organization config
//! tenant-config resolve --project project.json --branch branch.json
//!
//! # Only what is final at the branch level
//! tenant-config resolve --branch branch.json --level branch --rendered
//!
//! # Every level with its warnings
//! tenant-config resolve --environment env.json --report
//! ```

use std::path::{Path, PathBuf};

use clap::Args;
use config_format::NormalizedConfig;
use config_manager::{render, ConfigLevel, ConfigurationMerger, LevelOverrides, LevelResolution};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use super::{check_cmd::warning_to_json, read_config, to_json, CommandOutput};
use crate::{config::AppConfig, errors::CliResult};

#[cfg(test)]
#[path = "resolve_cmd_tests.rs"]
mod tests;

/// Arguments for `resolve`.
///
/// Levels without a file resolve with an empty override.
#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Project-level override
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// Branch-level override
    #[arg(long)]
    pub branch: Option<PathBuf>,

    /// Environment-level override
    #[arg(long)]
    pub environment: Option<PathBuf>,

    /// Organization-level override
    #[arg(long)]
    pub organization: Option<PathBuf>,

    /// Level to resolve up to
    #[arg(long, default_value = "organization")]
    pub level: ConfigLevel,

    /// Keep only the fields no later level can override
    #[arg(long)]
    pub rendered: bool,

    /// Print every level with its warnings instead of the final config
    #[arg(long)]
    pub report: bool,
}

impl ResolveArgs {
    fn file_for(&self, level: ConfigLevel) -> Option<&Path> {
        match level {
            ConfigLevel::Project => self.project.as_deref(),
            ConfigLevel::Branch => self.branch.as_deref(),
            ConfigLevel::Environment => self.environment.as_deref(),
            ConfigLevel::Organization => self.organization.as_deref(),
        }
    }
}

/// Resolves the given overrides and returns JSON.
#[instrument(skip_all, fields(level = %args.level))]
pub fn execute(args: &ResolveArgs, app_config: &AppConfig) -> CliResult<CommandOutput> {
    let mut overrides = LevelOverrides::new();
    for level in ConfigLevel::ALL {
        if let Some(path) = args.file_for(level) {
            overrides.set(level, read_config(path)?);
        }
    }

    let mut merger = ConfigurationMerger::new()?;
    if let Some(options) = app_config.normalize {
        merger = merger.with_normalize_options(options);
    }

    let resolutions = merger.resolve_up_to(&overrides, args.level)?;
    for resolution in &resolutions {
        for warning in &resolution.warnings {
            warn!(
                "{} config: {} ({})",
                resolution.level, warning.message, warning.field_path
            );
        }
    }
    info!("Resolved {} levels", resolutions.len());

    let project = |resolution: &LevelResolution| -> NormalizedConfig {
        if args.rendered {
            render(merger.registry(), resolution.level, &resolution.resolved)
        } else {
            resolution.resolved.clone()
        }
    };

    let output = if args.report {
        let report: Vec<Value> = resolutions
            .iter()
            .map(|resolution| {
                json!({
                    "level": resolution.level,
                    "config": Value::from(&project(resolution)),
                    "warnings": resolution.warnings.iter().map(warning_to_json).collect::<Vec<_>>(),
                })
            })
            .collect();
        to_json(&report, app_config.output.pretty)?
    } else {
        let target = resolutions
            .last()
            .map(project)
            .unwrap_or_default();
        to_json(&target, app_config.output.pretty)?
    };

    Ok(CommandOutput::success(output))
}
