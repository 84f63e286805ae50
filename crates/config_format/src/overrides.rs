//! The override engine.
//!
//! Overriding layers one flat config on top of another. Writing a key clears
//! every entry of the base that lives at or below that key (shadow-clearing),
//! then the overlay's entries are written on top. Values are never merged
//! recursively and nulls are kept as literals for the normalizer to resolve.

use crate::errors::FormatResult;
use crate::path::KeyPath;
use crate::validation::assert_valid_config;
use crate::value::Config;
use tracing::debug;

/// Layers `overlay` on top of `base`.
///
/// Absent entries of `overlay` express no opinion and are ignored. Neither
/// input is modified.
///
/// # Errors
///
/// Returns [`crate::FormatError::InvalidConfig`] if either input is not
/// structurally valid.
///
/// # Examples
///
/// ```
/// use config_format::{override_config, Config, ConfigValue};
///
/// let base = Config::new().with("c.e.f", 4_i64).with("c.g", 5_i64);
/// let overlay = Config::new().with("c.e", ConfigValue::Null);
///
/// let result = override_config(&base, &overlay)?;
/// assert!(!result.contains_key("c.e.f"));
/// assert_eq!(result.get("c.e"), Some(&ConfigValue::Null));
/// assert!(result.has("c.g"));
/// # Ok::<(), config_format::FormatError>(())
/// ```
pub fn override_config(base: &Config, overlay: &Config) -> FormatResult<Config> {
    assert_valid_config(base)?;
    assert_valid_config(overlay)?;

    let mut result = base.clone();
    for (key, _) in overlay.present() {
        let before = result.len();
        result.retain(|existing| !KeyPath::parse(existing).is_shadowed_by(key));
        let cleared = before - result.len();
        if cleared > 0 {
            debug!(key = key, cleared = cleared, "Cleared shadowed entries");
        }
    }
    for (key, value) in overlay.present() {
        result.insert(key, value.clone());
    }
    Ok(result)
}

/// Applies `overrides` to `base` from left to right.
///
/// With no overrides the base is returned unchanged and unvalidated.
pub fn override_all<'a, I>(base: &Config, overrides: I) -> FormatResult<Config>
where
    I: IntoIterator<Item = &'a Config>,
{
    overrides
        .into_iter()
        .try_fold(base.clone(), |acc, overlay| override_config(&acc, overlay))
}

#[cfg(test)]
#[path = "overrides_tests.rs"]
mod tests;
