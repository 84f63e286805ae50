//! Settings for the tenant-config CLI.
//!
//! The CLI reads an optional TOML file with defaults for every command.
//! Command-line flags take precedence over the file.
//!
//! # Example TOML Configuration
//!
//! ```toml
//! [normalize]
//! on_dot_into_non_object = "ignore"
//! on_dot_into_null = "empty-object"
//!
//! [output]
//! pretty = false
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use config_format::NormalizeOptions;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::Error;

/// Default settings file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILENAME: &str = "tenant-config.toml";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Settings for the tenant-config CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Policies used by `normalize` when no flag overrides them.
    ///
    /// `resolve` keeps its own default of skipping dotted keys that run into
    /// a non-object unless this section is present.
    #[serde(default)]
    pub normalize: Option<NormalizeOptions>,

    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file does not exist, cannot be read, or
    /// is not valid TOML for these settings.
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read configuration file: {}", e)))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse configuration file: {}", e)))?;

        Ok(config)
    }

    /// Loads the settings the CLI should run with.
    ///
    /// An explicitly given path must exist. Without one, the default file in
    /// the current directory is used if present, and built-in defaults
    /// otherwise.
    pub fn load_or_default(config_path: Option<&str>) -> Result<Self, Error> {
        let path = get_config_path(config_path);
        if config_path.is_none() && !path.exists() {
            debug!("No configuration file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Saves the settings as pretty TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        debug!("Saving configuration to {:?}", path);

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create directory: {}", e)))?;
        }

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write configuration file: {}", e)))?;

        info!("Configuration saved to {:?}", path);
        Ok(())
    }
}

/// How command output is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    #[serde(default = "OutputConfig::default_pretty")]
    pub pretty: bool,
}

impl OutputConfig {
    fn default_pretty() -> bool {
        true
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: Self::default_pretty(),
        }
    }
}

/// Resolves the path to the settings file.
///
/// Uses `config_path` if given, otherwise [`DEFAULT_CONFIG_FILENAME`] in the
/// current directory.
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    if let Some(path) = config_path {
        PathBuf::from(path)
    } else {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        current_dir.join(DEFAULT_CONFIG_FILENAME)
    }
}
