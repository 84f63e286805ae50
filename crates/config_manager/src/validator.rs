//! Override error checking and incomplete-config warnings.
//!
//! Two different questions are asked about a config:
//!
//! - **Override errors**: can this partial override be stored at all? This is
//!   decided from the override alone, without a base config, so only per-key
//!   shape checks are possible. Stored overrides must never have errors.
//! - **Incomplete-config warnings**: does the override, merged with its
//!   parents, satisfy the full schema? A changing parent can make a
//!   previously fine override produce warnings, so warnings never block.
//!
//! # Examples
//!
//! ```rust
//! use config_format::Config;
//! use config_manager::{get_config_override_errors, ConfigLevel, OverrideCheckOptions, SchemaRegistry};
//!
//! let registry = SchemaRegistry::new()?;
//! let config = Config::new().with("teams.allowClientTeamCreation", true);
//!
//! let result = get_config_override_errors(&registry, ConfigLevel::Branch, &config, OverrideCheckOptions::default())?;
//! assert!(result.is_valid());
//! # Ok::<(), config_manager::ConfigurationError>(())
//! ```

use crate::{
    errors::{ConfigurationError, ConfigurationResult},
    hierarchy::ConfigLevel,
    schema::{compile_schema, SchemaRegistry},
};
use config_format::{
    get_invalid_config_reason, normalize, Config, DotIntoNull, FormatError, KeyPath,
    NormalizeOptions,
};
use serde_json::Value;
use tracing::{debug, error};

/// Result of configuration validation.
///
/// Contains all validation errors and warnings found during validation.
/// Validation is considered successful only if no errors are present.
///
/// # Examples
///
/// ```rust
/// use config_manager::{ValidationResult, ValidationError, ValidationErrorType};
///
/// let mut result = ValidationResult::new();
/// assert!(result.is_valid());
///
/// result.add_error(ValidationError {
///     error_type: ValidationErrorType::UnknownKey,
///     field_path: "teams.maxSize".to_string(),
///     message: r#"The key "teams.maxSize" is not valid for the schema."#.to_string(),
///     suggestion: None,
/// });
///
/// assert!(!result.is_valid());
/// ```
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// List of validation errors (blocking issues).
    pub errors: Vec<ValidationError>,
    /// List of validation warnings (non-blocking suggestions).
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Create a new empty validation result.
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if validation passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add a validation error.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Add a validation warning.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// All error messages joined into one line.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Individual validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The category of validation error.
    pub error_type: ValidationErrorType,
    /// Dotted config key the error refers to. Empty for whole-document errors.
    pub field_path: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    pub suggestion: Option<String>,
}

/// Validation error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorType {
    /// The override is not a structurally valid config.
    InvalidFormat,
    /// The key does not exist in the level's schema.
    UnknownKey,
    /// The key exists, but an earlier level has fixed it.
    OverrideNotAllowed,
    /// The value does not match the key's override schema.
    SchemaViolation,
}

impl std::fmt::Display for ValidationErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormat => write!(f, "InvalidFormat"),
            Self::UnknownKey => write!(f, "UnknownKey"),
            Self::OverrideNotAllowed => write!(f, "OverrideNotAllowed"),
            Self::SchemaViolation => write!(f, "SchemaViolation"),
        }
    }
}

/// Non-blocking validation warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Dotted config key the warning refers to. Empty for whole-document warnings.
    pub field_path: String,
    /// Human-readable warning message.
    pub message: String,
    /// Optional recommendation for resolving the warning.
    pub recommendation: Option<String>,
}

/// Options for [`get_config_override_errors`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverrideCheckOptions {
    /// Accept keys that an earlier level has already fixed. Used for
    /// incomplete configs, which carry the values inherited from parents.
    pub allow_properties_that_can_no_longer_be_overridden: bool,
}

impl OverrideCheckOptions {
    /// Options that accept keys fixed by earlier levels.
    pub fn allowing_fixed_properties() -> Self {
        Self {
            allow_properties_that_can_no_longer_be_overridden: true,
        }
    }
}

/// Checks a partial override for `level` without looking at any base config.
///
/// Absent entries are skipped. Every other key must resolve in the level's
/// override schema, and its value must satisfy the resolved sub-schema.
///
/// # Arguments
///
/// * `registry` - Schemas of every level
/// * `level` - The level the override is stored at
/// * `config` - The override to check
/// * `options` - Whether keys fixed by earlier levels are accepted
///
/// # Returns
///
/// A `ValidationResult` with one error per rejected key. A structurally
/// invalid override yields a single `InvalidFormat` error.
///
/// # Errors
///
/// Returns `ConfigurationError::SchemaCompilation` if a sub-schema cannot be compiled.
pub fn get_config_override_errors(
    registry: &SchemaRegistry,
    level: ConfigLevel,
    config: &Config,
    options: OverrideCheckOptions,
) -> ConfigurationResult<ValidationResult> {
    debug!("Checking {} override with {} keys", level, config.len());
    let mut result = ValidationResult::new();

    // Step 1: Check config format
    if let Some(reason) = get_invalid_config_reason(config, "override") {
        result.add_error(ValidationError {
            error_type: ValidationErrorType::InvalidFormat,
            field_path: String::new(),
            message: format!("Invalid config format: {}", reason),
            suggestion: None,
        });
        return Ok(result);
    }

    for (key, value) in config.present() {
        // Step 2: Resolve the key in the override schema
        let path = KeyPath::parse(key);
        let first_segment = path.segments().first().copied().unwrap_or_default();
        let is_fixed = registry
            .no_longer_overridable_keys(level)
            .iter()
            .any(|fixed| *fixed == first_segment);
        if is_fixed && !options.allow_properties_that_can_no_longer_be_overridden {
            result.add_error(ValidationError {
                error_type: ValidationErrorType::OverrideNotAllowed,
                field_path: key.to_string(),
                message: invalid_key_message(key),
                suggestion: level
                    .parent()
                    .map(|parent| format!("Set \"{}\" at the {} level", first_segment, parent)),
            });
            continue;
        }

        let Some(sub_schema) = registry.sub_schema(level, key) else {
            result.add_error(ValidationError {
                error_type: ValidationErrorType::UnknownKey,
                field_path: key.to_string(),
                message: invalid_key_message(key),
                suggestion: None,
            });
            continue;
        };

        // Step 3: Validate the value against the key's sub-schema
        let validator = compile_schema(level, &sub_schema)?;
        let instance = Value::from(value);
        for violation in validator.iter_errors(&instance) {
            result.add_error(ValidationError {
                error_type: ValidationErrorType::SchemaViolation,
                field_path: key.to_string(),
                message: format!("{}: {}", key, violation),
                suggestion: None,
            });
        }
    }

    if !result.is_valid() {
        debug!(
            "{} override has {} errors: {}",
            level,
            result.errors.len(),
            result.error_summary()
        );
    }
    Ok(result)
}

fn invalid_key_message(key: &str) -> String {
    format!("The key {} is not valid for the schema.", Value::from(key))
}

/// Fails if the override has errors.
///
/// Only used where the override must already have been checked, so any error
/// is an internal invariant violation rather than bad user input.
pub fn assert_no_config_override_errors(
    registry: &SchemaRegistry,
    level: ConfigLevel,
    config: &Config,
    options: OverrideCheckOptions,
) -> ConfigurationResult<()> {
    let result = get_config_override_errors(registry, level, config, options)?;
    if result.is_valid() {
        return Ok(());
    }

    let message = format!(
        "Config override is invalid at a place where it should have already been validated! {}",
        result.error_summary()
    );
    error!("{}", message);
    Err(ConfigurationError::InvariantViolation { message })
}

/// Collects warnings about an incomplete config.
///
/// The config is expected to be an override merged with its parents. It is
/// normalized, materializing missing parents as empty objects, and then
/// checked against the level's full schema.
///
/// # Errors
///
/// Returns `ConfigurationError::InvariantViolation` if the config has
/// override errors, since every incomplete config must also be a valid override.
pub fn get_incomplete_config_warnings(
    registry: &SchemaRegistry,
    level: ConfigLevel,
    config: &Config,
) -> ConfigurationResult<Vec<ValidationWarning>> {
    assert_no_config_override_errors(
        registry,
        level,
        config,
        OverrideCheckOptions::allowing_fixed_properties(),
    )?;

    let options = NormalizeOptions::new().with_dot_into_null(DotIntoNull::EmptyObject);
    let normalized = match normalize(config, options) {
        Ok(normalized) => normalized,
        Err(FormatError::Normalization(e)) => {
            return Ok(vec![ValidationWarning {
                field_path: String::new(),
                message: format!("Config is not normalizable. {}", e),
                recommendation: None,
            }]);
        }
        Err(e) => return Err(e.into()),
    };

    let warnings: Vec<ValidationWarning> = registry
        .schema_errors(level, &Value::from(&normalized))
        .into_iter()
        .map(|message| ValidationWarning {
            field_path: String::new(),
            message,
            recommendation: None,
        })
        .collect();

    debug!("{} config has {} warnings", level, warnings.len());
    Ok(warnings)
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
