//! Structural validation of configuration documents.
//!
//! A config is valid when it is an object whose keys are legal dot-notation
//! paths at every depth. Validation reports a human-readable reason rather than
//! an error; callers that treat invalid input as a bug use
//! [`assert_valid_config`].

use crate::errors::{FormatError, FormatResult};
use crate::path::is_valid_key;
use crate::value::{Config, ConfigValue};
use serde_json::Value;
use tracing::error;

/// Name used for the root document in reason strings.
pub const DEFAULT_CONFIG_NAME: &str = "config";

fn invalid_key_reason(name: &str, key: &str) -> String {
    format!(
        "All keys of {name} must consist of only alphanumeric characters, dots, underscores, colons, dollar signs, or hyphens and start with a character other than a hyphen (found: {key})"
    )
}

/// Returns true if `config` has legal keys at every depth.
pub fn is_valid_config(config: &Config) -> bool {
    get_invalid_config_reason(config, DEFAULT_CONFIG_NAME).is_none()
}

/// Explains why `config` is invalid, or returns `None` if it is valid.
///
/// `name` prefixes the reason; nested values are named `{name}.{key}` and
/// array elements `{name}[{index}]`. Absent entries are always accepted.
///
/// # Examples
///
/// ```
/// use config_format::{get_invalid_config_reason, Config};
///
/// let config = Config::new().with("teams.-bad", true);
/// let reason = get_invalid_config_reason(&config, "override").unwrap();
/// assert!(reason.starts_with("All keys of override must"));
/// assert!(reason.ends_with("(found: teams.-bad)"));
/// ```
pub fn get_invalid_config_reason(config: &Config, name: &str) -> Option<String> {
    config.present().find_map(|(key, value)| {
        if !is_valid_key(key) {
            return Some(invalid_key_reason(name, key));
        }
        get_invalid_value_reason(value, &format!("{name}.{key}"))
    })
}

fn get_invalid_value_reason(value: &ConfigValue, name: &str) -> Option<String> {
    match value {
        ConfigValue::String(_)
        | ConfigValue::Number(_)
        | ConfigValue::Boolean(_)
        | ConfigValue::Null => None,
        ConfigValue::Array(items) => items
            .iter()
            .enumerate()
            .find_map(|(index, item)| get_invalid_value_reason(item, &format!("{name}[{index}]"))),
        ConfigValue::Object(config) => get_invalid_config_reason(config, name),
    }
}

/// Returns true if `value` is a JSON object forming a valid config.
pub fn is_valid_json_config(value: &Value) -> bool {
    get_invalid_json_config_reason(value, DEFAULT_CONFIG_NAME).is_none()
}

/// Same check as [`get_invalid_config_reason`] for untyped JSON input.
pub fn get_invalid_json_config_reason(value: &Value, name: &str) -> Option<String> {
    let Value::Object(map) = value else {
        return Some(format!("{name} must be a non-null object"));
    };
    map.iter().find_map(|(key, value)| {
        if !is_valid_key(key) {
            return Some(invalid_key_reason(name, key));
        }
        get_invalid_json_value_reason(value, &format!("{name}.{key}"))
    })
}

fn get_invalid_json_value_reason(value: &Value, name: &str) -> Option<String> {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => None,
        Value::Array(items) => items.iter().enumerate().find_map(|(index, item)| {
            get_invalid_json_value_reason(item, &format!("{name}[{index}]"))
        }),
        Value::Object(_) => get_invalid_json_config_reason(value, name),
    }
}

/// Fails with [`FormatError::InvalidConfig`] if `config` is not valid.
///
/// Invalid input at this point means an upstream step (such as migration)
/// produced a malformed document.
pub fn assert_valid_config(config: &Config) -> FormatResult<()> {
    match get_invalid_config_reason(config, DEFAULT_CONFIG_NAME) {
        None => Ok(()),
        Some(reason) => {
            error!(reason = %reason, config = %config, "Structurally invalid config reached the format engine");
            Err(FormatError::InvalidConfig { reason })
        }
    }
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
