//! Rendered configs: what a level contributes on its own.
//!
//! A resolved config carries every field inherited from earlier levels, but
//! most of those fields can still be changed further down the chain. The
//! rendered projection keeps only the top-level fields whose value is final
//! at this level, either because no later level's schema has them, or
//! because later levels can no longer override them.

use crate::{hierarchy::ConfigLevel, schema::SchemaRegistry};
use config_format::NormalizedConfig;
use tracing::debug;

#[cfg(test)]
#[path = "rendered_tests.rs"]
mod tests;

/// Top-level keys whose value is final once `level` is resolved.
pub fn rendered_keys(registry: &SchemaRegistry, level: ConfigLevel) -> Vec<&str> {
    registry
        .top_level_keys(level)
        .into_iter()
        .filter(|key| {
            level.descendants().iter().all(|&later| {
                let fixed = registry.no_longer_overridable_keys(later);
                !registry.top_level_keys(later).contains(key)
                    || fixed.iter().any(|fixed_key| fixed_key == key)
            })
        })
        .collect()
}

/// Projects a resolved config onto the keys that are final at `level`.
///
/// # Examples
///
/// ```rust
/// use config_format::NormalizedConfig;
/// use config_manager::{render, ConfigLevel, SchemaRegistry};
/// use serde_json::json;
///
/// let registry = SchemaRegistry::new()?;
/// let resolved = NormalizedConfig::try_from(json!({
///     "sourceOfTruth": { "type": "hosted" },
///     "teams": { "allowClientTeamCreation": true }
/// }))?;
///
/// let rendered = render(&registry, ConfigLevel::Branch, &resolved);
/// assert!(rendered.contains_key("sourceOfTruth"));
/// assert!(!rendered.contains_key("teams"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render(
    registry: &SchemaRegistry,
    level: ConfigLevel,
    config: &NormalizedConfig,
) -> NormalizedConfig {
    let keys = rendered_keys(registry, level);
    let mut rendered = config.clone();
    rendered.retain(|key| keys.iter().any(|kept| *kept == key));
    debug!("Rendered {} config with keys {:?}", level, keys);
    rendered
}
