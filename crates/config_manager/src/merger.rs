//! Level resolution pipeline.
//!
//! This module turns the stored overrides of every level into resolved
//! configs. Each level is resolved on top of the *overridden* config of its
//! parent (the parent's overrides merged, but before defaults), so defaults
//! never mask a value a child level is allowed to change.
//!
//! # Pipeline
//!
//! For every level, in hierarchy order:
//! 1. **Migrate** the stored override to the current schema
//! 2. **Check** the override; stored overrides must never have errors
//! 3. **Override** the parent's overridden config with it
//! 4. **Warn** about anything the merged config is still missing
//! 5. **Default** every field the merged config leaves unset
//! 6. **Normalize** into the nested form
//! 7. **Sanitize** values that are only consistent as a whole
//!
//! # Examples
//!
//! ```rust
//! use config_format::Config;
//! use config_manager::{ConfigLevel, ConfigurationMerger, LevelOverrides};
//!
//! let merger = ConfigurationMerger::new()?;
//! let overrides = LevelOverrides::new()
//!     .with(ConfigLevel::Branch, Config::new().with("teams.allowClientTeamCreation", true));
//!
//! let organization = merger.resolve(&overrides, ConfigLevel::Organization)?;
//! let value = organization.resolved.get_path(&["teams", "allowClientTeamCreation"]);
//! assert_eq!(value.and_then(|v| v.as_bool()), Some(true));
//! # Ok::<(), config_manager::ConfigurationError>(())
//! ```

use crate::{
    defaults::apply_level_defaults,
    errors::{ConfigurationError, ConfigurationResult},
    hierarchy::ConfigLevel,
    migration::migrate_config_override,
    sanitize::sanitize_config,
    schema::SchemaRegistry,
    validator::{
        get_config_override_errors, get_incomplete_config_warnings, OverrideCheckOptions,
        ValidationWarning,
    },
};
use config_format::{
    normalize, override_config, Config, DotIntoNonObject, NormalizeOptions, NormalizedConfig,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[cfg(test)]
#[path = "merger_tests.rs"]
mod tests;

/// The outcome of resolving a single level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelResolution {
    pub level: ConfigLevel,
    /// The overrides of this level and all its parents, merged but not
    /// defaulted. Child levels are resolved on top of this.
    pub overridden: Config,
    /// The defaulted, normalized and sanitized config.
    pub resolved: NormalizedConfig,
    /// Problems the merged overrides still have against the full schema.
    pub warnings: Vec<ValidationWarning>,
}

/// The stored override of every level.
///
/// Levels without an override use an empty one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelOverrides {
    overrides: [Config; 4],
}

impl LevelOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`LevelOverrides::set`].
    pub fn with(mut self, level: ConfigLevel, config: Config) -> Self {
        self.set(level, config);
        self
    }

    /// Replaces the override stored for `level`.
    pub fn set(&mut self, level: ConfigLevel, config: Config) {
        self.overrides[level as usize] = config;
    }

    pub fn get(&self, level: ConfigLevel) -> &Config {
        &self.overrides[level as usize]
    }
}

/// Resolves levels through the migrate, check, override, default, normalize
/// and sanitize pipeline.
///
/// The merger only holds the compiled schemas and normalization policy, so
/// it is cheap to clone and safe to share between threads.
#[derive(Debug, Clone)]
pub struct ConfigurationMerger {
    registry: Arc<SchemaRegistry>,
    normalize_options: NormalizeOptions,
}

impl ConfigurationMerger {
    /// Creates a merger with freshly built schemas.
    ///
    /// Dotted keys that run into a non-object are skipped during
    /// normalization rather than failing the whole resolution.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::SchemaCompilation` if the schemas cannot be built.
    pub fn new() -> ConfigurationResult<Self> {
        Ok(Self::with_registry(Arc::new(SchemaRegistry::new()?)))
    }

    /// Creates a merger that shares an existing registry.
    pub fn with_registry(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            normalize_options: NormalizeOptions::new()
                .with_dot_into_non_object(DotIntoNonObject::Ignore),
        }
    }

    /// Uses `options` when normalizing resolved configs.
    pub fn with_normalize_options(mut self, options: NormalizeOptions) -> Self {
        self.normalize_options = options;
        self
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        self.normalize_options
    }

    /// Resolves one level on top of its parent's overridden config.
    ///
    /// # Arguments
    ///
    /// * `parent_overridden` - The parent level's [`LevelResolution::overridden`];
    ///   empty for the project level
    /// * `level` - The level being resolved
    /// * `raw_override` - The override stored for `level`, possibly in a legacy shape
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if:
    /// - Migration fails
    /// - The migrated override has errors (`OverrideRejected`)
    /// - Normalization fails under a throwing policy
    #[instrument(skip(self, parent_overridden, raw_override), fields(level = %level))]
    pub fn resolve_level(
        &self,
        parent_overridden: &Config,
        level: ConfigLevel,
        raw_override: &Config,
    ) -> ConfigurationResult<LevelResolution> {
        // Step 1: Migrate the stored override
        let migrated = migrate_config_override(level, raw_override)?;

        // Step 2: Check the migrated override
        let check = get_config_override_errors(
            &self.registry,
            level,
            &migrated,
            OverrideCheckOptions::default(),
        )?;
        if !check.is_valid() {
            warn!("Rejected {} override: {}", level, check.error_summary());
            return Err(ConfigurationError::OverrideRejected {
                level,
                reason: check.error_summary(),
            });
        }

        // Step 3: Layer the override on top of the parent
        debug!("Overriding parent config with {} keys", migrated.len());
        let overridden = override_config(parent_overridden, &migrated)?;

        // Step 4: Collect warnings for the merged overrides
        let warnings = get_incomplete_config_warnings(&self.registry, level, &overridden)?;
        if !warnings.is_empty() {
            debug!("{} config has {} warnings", level, warnings.len());
        }

        // Step 5: Apply the defaults of this level and its parents
        let defaulted = apply_level_defaults(level, &overridden);

        // Step 6: Normalize
        let normalized = normalize(&defaulted, self.normalize_options)?;

        // Step 7: Sanitize
        let resolved = sanitize_config(level, normalized);

        Ok(LevelResolution {
            level,
            overridden,
            resolved,
            warnings,
        })
    }

    /// Resolves every level from the project down to `target`.
    ///
    /// # Returns
    ///
    /// One resolution per level, parent first.
    #[instrument(skip(self, overrides), fields(target = %target))]
    pub fn resolve_up_to(
        &self,
        overrides: &LevelOverrides,
        target: ConfigLevel,
    ) -> ConfigurationResult<Vec<LevelResolution>> {
        info!("Starting configuration resolution");

        let mut resolutions: Vec<LevelResolution> = Vec::new();
        for &level in target.ancestors_and_self() {
            let parent = resolutions
                .last()
                .map(|parent| parent.overridden.clone())
                .unwrap_or_default();
            let resolution = self.resolve_level(&parent, level, overrides.get(level))?;
            resolutions.push(resolution);
        }

        info!("Resolved {} levels", resolutions.len());
        Ok(resolutions)
    }

    /// Resolves all four levels.
    pub fn resolve_chain(
        &self,
        overrides: &LevelOverrides,
    ) -> ConfigurationResult<Vec<LevelResolution>> {
        self.resolve_up_to(overrides, ConfigLevel::Organization)
    }

    /// Resolves `target` and returns only its resolution.
    pub fn resolve(
        &self,
        overrides: &LevelOverrides,
        target: ConfigLevel,
    ) -> ConfigurationResult<LevelResolution> {
        self.resolve_up_to(overrides, target)?
            .pop()
            .ok_or_else(|| ConfigurationError::InvariantViolation {
                message: format!("Resolving {} produced no levels", target),
            })
    }
}
