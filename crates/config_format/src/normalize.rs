//! The normalizer.
//!
//! Normalization expands dot-notation keys into nested structure and resolves
//! top-level nulls into deletions. Keys are applied shallowest first, so a
//! dotted key always sees the structure its ancestors created.
//!
//! How a dotted key that cannot be resolved is handled depends on
//! [`NormalizeOptions`]: either the whole call fails with a
//! [`NormalizationError`] or the offending key is skipped with a warning.
//!
//! Arrays can be addressed with numeric segments. An in-range index selects an
//! element, the index equal to the array length appends, and assigning null to
//! an index removes that element. Index segments sort numerically, and
//! removals run after every other key, highest index first, so an index
//! always names the element's position in the input.

use crate::errors::{FormatError, FormatResult, NormalizationError};
use crate::path::{dot_count, KeyPath};
use crate::validation::{assert_valid_config, is_valid_config};
use crate::value::{Config, ConfigValue, NormalizedConfig, NormalizedValue};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, error, warn};

/// Policy for a dotted key whose parent segment is not an object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DotIntoNonObject {
    #[default]
    Throw,
    Ignore,
}

/// Policy for a dotted key whose parent segment does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DotIntoNull {
    /// Use the [`DotIntoNonObject`] policy.
    #[default]
    LikeNonObject,
    Throw,
    Ignore,
    /// Create an empty object at the missing segment and keep descending.
    EmptyObject,
}

/// Strictness of [`normalize`] on malformed dot paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    pub on_dot_into_non_object: DotIntoNonObject,
    pub on_dot_into_null: DotIntoNull,
}

impl NormalizeOptions {
    /// Options that throw on every unresolvable path.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dot_into_non_object(mut self, policy: DotIntoNonObject) -> Self {
        self.on_dot_into_non_object = policy;
        self
    }

    pub fn with_dot_into_null(mut self, policy: DotIntoNull) -> Self {
        self.on_dot_into_null = policy;
        self
    }

    fn missing_policy(&self) -> MissingPolicy {
        match self.on_dot_into_null {
            DotIntoNull::LikeNonObject => MissingPolicy::Reject(self.on_dot_into_non_object),
            DotIntoNull::Throw => MissingPolicy::Reject(DotIntoNonObject::Throw),
            DotIntoNull::Ignore => MissingPolicy::Reject(DotIntoNonObject::Ignore),
            DotIntoNull::EmptyObject => MissingPolicy::EmptyObject,
        }
    }
}

enum MissingPolicy {
    Reject(DotIntoNonObject),
    EmptyObject,
}

/// A container the walk can descend into.
enum Slot<'a> {
    Object(&'a mut NormalizedConfig),
    Array(&'a mut Vec<NormalizedValue>),
}

/// Expands `config` into its normalized form.
///
/// # Errors
///
/// - [`FormatError::InvalidConfig`] if `config` is not structurally valid.
/// - [`FormatError::Normalization`] if a dotted key cannot be resolved and the
///   applicable policy throws, or if a null appears inside an array.
///
/// # Examples
///
/// ```
/// use config_format::{normalize, Config, DotIntoNonObject, NormalizeOptions};
/// use serde_json::{json, Value};
///
/// let config = Config::try_from(json!({
///     "c": {},
///     "c.d": 10,
///     "c.e": null,
///     "b": 1,
///     "b.c": 2,
/// }))?;
/// let options = NormalizeOptions::new().with_dot_into_non_object(DotIntoNonObject::Ignore);
///
/// let normalized = normalize(&config, options)?;
/// assert_eq!(Value::from(&normalized), json!({"b": 1, "c": {"d": 10}}));
/// # Ok::<(), config_format::FormatError>(())
/// ```
pub fn normalize(config: &Config, options: NormalizeOptions) -> FormatResult<NormalizedConfig> {
    assert_valid_config(config)?;
    normalize_entries(config, options)
}

fn normalize_entries(config: &Config, options: NormalizeOptions) -> FormatResult<NormalizedConfig> {
    let mut entries: Vec<(KeyPath<'_>, &ConfigValue)> = config
        .present()
        .map(|(key, value)| (KeyPath::parse(key), value))
        .collect();
    entries.sort_by(|(a, _), (b, _)| {
        dot_count(a.key())
            .cmp(&dot_count(b.key()))
            .then_with(|| compare_segments(a.segments(), b.segments()))
    });

    let mut result = NormalizedConfig::new();
    let mut removals = Vec::new();
    for (path, value) in entries {
        let key = path.key();
        let (parents, last) = path.split_last();
        let Some(slot) = descend(Slot::Object(&mut result), key, parents, options)? else {
            continue;
        };
        if assign(slot, key, last, value, options)? {
            removals.push(path);
        }
    }

    removals.sort_by(|a, b| compare_segments(b.segments(), a.segments()));
    for path in &removals {
        remove_element(&mut result, path.segments());
    }
    Ok(result)
}

/// Sort key for a path segment. Canonical indices compare as numbers.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum SegmentOrder<'a> {
    Index(usize),
    Name(&'a str),
}

impl<'a> SegmentOrder<'a> {
    fn of(segment: &'a str) -> Self {
        parse_index(segment).map_or(SegmentOrder::Name(segment), SegmentOrder::Index)
    }
}

fn compare_segments(a: &[&str], b: &[&str]) -> Ordering {
    a.iter()
        .map(|segment| SegmentOrder::of(segment))
        .cmp(b.iter().map(|segment| SegmentOrder::of(segment)))
}

/// Removes the array element `segments` points at, if it still exists.
fn remove_element(root: &mut NormalizedConfig, segments: &[&str]) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let Some(index) = parse_index(last) else {
        return;
    };

    let mut slot = Slot::Object(root);
    for &segment in parents {
        let child = match slot {
            Slot::Object(map) => map.get_mut(segment),
            Slot::Array(items) => parse_index(segment).and_then(|i| items.get_mut(i)),
        };
        slot = match child {
            Some(NormalizedValue::Object(map)) => Slot::Object(map),
            Some(NormalizedValue::Array(items)) => Slot::Array(items),
            _ => return,
        };
    }

    if let Slot::Array(items) = slot {
        if index < items.len() {
            items.remove(index);
        }
    }
}

fn descend<'a>(
    mut slot: Slot<'a>,
    key: &str,
    parents: &[&str],
    options: NormalizeOptions,
) -> FormatResult<Option<Slot<'a>>> {
    for &segment in parents {
        let child = match slot {
            Slot::Object(map) => {
                if !map.contains_key(segment) {
                    match options.missing_policy() {
                        MissingPolicy::EmptyObject => {
                            map.insert(segment, NormalizedConfig::new());
                        }
                        MissingPolicy::Reject(policy) => {
                            return reject(policy, dot_into_missing(key, segment));
                        }
                    }
                }
                let Some(child) = map.get_mut(segment) else {
                    return Err(invariant(format!("segment {segment:?} vanished while normalizing {key:?}")));
                };
                child
            }
            Slot::Array(items) => match parse_index(segment).filter(|&index| index < items.len()) {
                Some(index) => &mut items[index],
                None => {
                    return reject(
                        options.on_dot_into_non_object,
                        NormalizationError::InvalidArrayIndex {
                            key: key.to_string(),
                            segment: segment.to_string(),
                        },
                    );
                }
            },
        };
        slot = match child {
            NormalizedValue::Object(map) => Slot::Object(map),
            NormalizedValue::Array(items) => Slot::Array(items),
            _ => {
                return reject(
                    options.on_dot_into_non_object,
                    NormalizationError::DotIntoNonObject {
                        key: key.to_string(),
                        segment: segment.to_string(),
                    },
                );
            }
        };
    }
    Ok(Some(slot))
}

/// Applies one entry. Returns true if it removes an array element, which the
/// caller does once every other entry is in place.
fn assign(
    slot: Slot<'_>,
    key: &str,
    last: &str,
    value: &ConfigValue,
    options: NormalizeOptions,
) -> FormatResult<bool> {
    match slot {
        Slot::Object(map) => {
            if value.is_null() {
                if map.remove(last).is_none() {
                    debug!(key = key, "Null override deletes nothing");
                }
            } else {
                map.insert(last, normalize_value(value, options)?);
            }
        }
        Slot::Array(items) => match (parse_index(last), value) {
            (Some(index), ConfigValue::Null) if index < items.len() => {
                return Ok(true);
            }
            (_, ConfigValue::Null) => {
                debug!(key = key, "Null override deletes nothing");
            }
            (Some(index), _) if index < items.len() => {
                items[index] = normalize_value(value, options)?;
            }
            (Some(index), _) if index == items.len() => {
                items.push(normalize_value(value, options)?);
            }
            _ => {
                reject::<()>(
                    options.on_dot_into_non_object,
                    NormalizationError::InvalidArrayIndex {
                        key: key.to_string(),
                        segment: last.to_string(),
                    },
                )?;
            }
        },
    }
    Ok(false)
}

/// Normalizes a value assigned at a key.
///
/// Objects are normalized like a top-level config, so a null inside an object
/// literal deletes its key. A null inside an array has no such meaning.
fn normalize_value(value: &ConfigValue, options: NormalizeOptions) -> FormatResult<NormalizedValue> {
    Ok(match value {
        ConfigValue::Null => return Err(NormalizationError::NullValue.into()),
        ConfigValue::String(s) => NormalizedValue::String(s.clone()),
        ConfigValue::Number(n) => NormalizedValue::Number(n.clone()),
        ConfigValue::Boolean(b) => NormalizedValue::Boolean(*b),
        ConfigValue::Array(items) => NormalizedValue::Array(
            items
                .iter()
                .map(|item| normalize_value(item, options))
                .collect::<FormatResult<_>>()?,
        ),
        ConfigValue::Object(config) => NormalizedValue::Object(normalize_entries(config, options)?),
    })
}

fn reject<T>(policy: DotIntoNonObject, error: NormalizationError) -> FormatResult<Option<T>> {
    match policy {
        DotIntoNonObject::Throw => Err(error.into()),
        DotIntoNonObject::Ignore => {
            warn!(reason = %error, "Ignoring dot-notation key");
            Ok(None)
        }
    }
}

fn dot_into_missing(key: &str, segment: &str) -> NormalizationError {
    NormalizationError::DotIntoMissing {
        key: key.to_string(),
        segment: segment.to_string(),
    }
}

fn invariant(message: String) -> FormatError {
    error!(message = %message, "Normalizer invariant violated");
    FormatError::InvariantViolation { message }
}

/// Parses a canonical array index ("0", "12", never "01" or "+1").
fn parse_index(segment: &str) -> Option<usize> {
    let index = segment.parse::<usize>().ok()?;
    (index.to_string() == segment).then_some(index)
}

/// Returns true if `config` is valid and has no dotted keys or null values.
///
/// Only top-level entries are inspected; nested objects are not checked.
pub fn is_normalized(config: &Config) -> bool {
    is_valid_config(config)
        && config
            .present()
            .all(|(key, value)| !KeyPath::parse(key).is_dotted() && !value.is_null())
}

/// Fails with [`FormatError::InvariantViolation`] unless [`is_normalized`] holds.
pub fn assert_normalized(config: &Config) -> FormatResult<()> {
    if is_normalized(config) {
        Ok(())
    } else {
        Err(invariant(format!("Config is not normalized: {config}")))
    }
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
