//! Migration of stored overrides to the current schema.
//!
//! Overrides are stored as written, so older documents may use field names or
//! shapes the current schema no longer accepts. They are migrated every time
//! they are read, before any validation. Every step is idempotent.
//!
//! A property can appear in a document either nested (`{"emails": {"theme": ...}}`)
//! or dotted (`{"emails.theme": ...}`), or in any mix of the two. The helpers
//! here follow every split of the path, so all spellings are handled.

use crate::{
    errors::{ConfigurationError, ConfigurationResult},
    hierarchy::ConfigLevel,
};
use config_format::{path::SEGMENT_SEPARATOR, Config, ConfigValue, KeyPath};
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
#[path = "migration_tests.rs"]
mod tests;

/// A rename that would move a property to a different parent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("oldPath and newPath must have the same prefix. Provided: {old_path} and {new_path}")]
pub struct PropertyPathMismatch {
    pub old_path: String,
    pub new_path: String,
}

fn join(segments: &[&str]) -> String {
    let separator = SEGMENT_SEPARATOR.to_string();
    segments.join(separator.as_str())
}

/// Replaces the value at `path` with `mapper(value)`, or deletes it when the
/// mapper returns `None`.
///
/// Every nested object reachable through a prefix of `path` is visited, so a
/// value stored as `{"a": {"b.c": 1}}` is found for the path `a.b.c`. Paths
/// that do not exist are left alone, as are absent entries.
pub fn map_property<F>(mut config: Config, path: &str, mapper: &mut F) -> Config
where
    F: FnMut(ConfigValue) -> Option<ConfigValue>,
{
    let key_path = KeyPath::parse(path);
    let segments = key_path.segments();

    for split in 1..segments.len() {
        let prefix = join(&segments[..split]);
        if let Some(ConfigValue::Object(nested)) = config.get_mut(&prefix) {
            let taken = std::mem::take(nested);
            *nested = map_property(taken, &join(&segments[split..]), mapper);
        }
    }

    if config.has(path) {
        if let Some(mapped) = config.remove(path).and_then(&mut *mapper) {
            config.insert(path, mapped);
        }
    }

    config
}

/// Deletes the value at `path` in every spelling.
pub fn remove_property(config: Config, path: &str) -> Config {
    map_property(config, path, &mut |_| None)
}

/// Moves the value at `old_path` to `new_path` in every spelling.
///
/// # Errors
///
/// Returns `PropertyPathMismatch` unless both paths share the same parent.
pub fn rename_property(
    mut config: Config,
    old_path: &str,
    new_path: &str,
) -> Result<Config, PropertyPathMismatch> {
    let old = KeyPath::parse(old_path);
    let new = KeyPath::parse(new_path);
    if old.split_last().0 != new.split_last().0 {
        return Err(PropertyPathMismatch {
            old_path: old_path.to_string(),
            new_path: new_path.to_string(),
        });
    }

    let old_segments = old.segments();
    let new_segments = new.segments();
    for split in 1..old_segments.len() {
        let prefix = join(&old_segments[..split]);
        if let Some(ConfigValue::Object(nested)) = config.get_mut(&prefix) {
            let taken = std::mem::take(nested);
            *nested = rename_property(
                taken,
                &join(&old_segments[split..]),
                &join(&new_segments[split..]),
            )?;
        }
    }

    if config.has(old_path) {
        if let Some(value) = config.remove(old_path) {
            config.insert(new_path, value);
        }
    }

    Ok(config)
}

/// Turns an array into an object keyed by element index.
fn array_to_record(value: ConfigValue) -> Option<ConfigValue> {
    match value {
        ConfigValue::Array(items) => Some(ConfigValue::Object(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item))
                .collect(),
        )),
        other => Some(other),
    }
}

/// Brings an override stored at `level` up to the current schema.
///
/// # Errors
///
/// Returns `ConfigurationError::Migration` if a migration step is malformed.
///
/// # Examples
///
/// ```rust
/// use config_format::Config;
/// use config_manager::{migrate_config_override, ConfigLevel};
///
/// let old = Config::new().with("emails.theme", "default-dark");
/// let migrated = migrate_config_override(ConfigLevel::Branch, &old)?;
///
/// assert!(migrated.get("emails.theme").is_none());
/// assert!(migrated.get("emails.selectedThemeId").is_some());
/// # Ok::<(), config_manager::ConfigurationError>(())
/// ```
pub fn migrate_config_override(level: ConfigLevel, config: &Config) -> ConfigurationResult<Config> {
    let mut migrated = config.clone();

    // emails.theme was renamed to emails.selectedThemeId
    if level.is_at_least(ConfigLevel::Branch) {
        migrated = rename_property(migrated, "emails.theme", "emails.selectedThemeId").map_err(
            |e| ConfigurationError::Migration {
                level,
                reason: e.to_string(),
            },
        )?;
    }

    // domains.trustedDomains used to be an array
    if level.is_at_least(ConfigLevel::Environment) {
        migrated = map_property(migrated, "domains.trustedDomains", &mut array_to_record);
    }

    // themeList and templateList were replaced before emails were released
    if level.is_at_least(ConfigLevel::Branch) {
        migrated = remove_property(migrated, "emails.themeList");
        migrated = remove_property(migrated, "emails.templateList");
    }

    // sourceOfTruth was sometimes written to environment overrides by mistake
    if level == ConfigLevel::Environment {
        migrated = remove_property(migrated, "sourceOfTruth");
    }

    if &migrated != config {
        debug!("Migrated {} override", level);
    }
    Ok(migrated)
}
