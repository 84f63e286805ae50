//! Configuration management for TenantConfig
//!
//! Tenant settings live at four levels: project, branch, environment and
//! organization. Each level stores a partial override in the format handled
//! by [`config_format`]. This crate adds what the format alone cannot know:
//!
//! - [`hierarchy`]: the levels and their order
//! - [`settings`] and [`schema`]: the typed settings of each level and the
//!   JSON schemas generated from them
//! - [`validator`]: checking overrides before they are stored, and warning
//!   about merged configs that are still incomplete
//! - [`migration`], [`defaults`] and [`sanitize`]: the per-level steps of
//!   resolving a config
//! - [`merger`]: the pipeline that runs those steps for a chain of levels
//! - [`rendered`]: the part of a resolved config that is final at its level
//!
//! # Examples
//!
//! ```rust
//! use config_format::Config;
//! use config_manager::{ConfigLevel, ConfigurationMerger, LevelOverrides};
//!
//! let merger = ConfigurationMerger::new()?;
//! let overrides = LevelOverrides::new()
//!     .with(ConfigLevel::Project, Config::new().with("sourceOfTruth.type", "hosted"))
//!     .with(ConfigLevel::Environment, Config::new().with("auth.allowSignUp", false));
//!
//! let resolutions = merger.resolve_chain(&overrides)?;
//! assert_eq!(resolutions.len(), 4);
//! # Ok::<(), config_manager::ConfigurationError>(())
//! ```

pub mod defaults;
pub mod errors;
pub mod hierarchy;
pub mod merger;
pub mod migration;
pub mod rendered;
pub mod sanitize;
pub mod schema;
pub mod settings;
pub mod validator;

// Re-export for convenient access
pub use defaults::{apply_defaults, apply_level_defaults, level_defaults, Defaults};
pub use errors::{ConfigurationError, ConfigurationResult};
pub use hierarchy::{ConfigLevel, UnknownConfigLevel};
pub use merger::{ConfigurationMerger, LevelOverrides, LevelResolution};
pub use migration::{
    map_property, migrate_config_override, remove_property, rename_property, PropertyPathMismatch,
};
pub use rendered::{render, rendered_keys};
pub use sanitize::sanitize_config;
pub use schema::{parse_incomplete_config, IncompleteConfig, SchemaRegistry};
pub use validator::{
    assert_no_config_override_errors, get_config_override_errors, get_incomplete_config_warnings,
    OverrideCheckOptions, ValidationError, ValidationErrorType, ValidationResult,
    ValidationWarning,
};
