//! The configuration value model.
//!
//! Two related families of types live here:
//!
//! - [`ConfigValue`] / [`Config`]: the unnormalized domain. Values may be
//!   [`ConfigValue::Null`] (a deletion request), keys may be dotted paths, and
//!   an entry may be *absent* (`None`), meaning "no opinion".
//! - [`NormalizedValue`] / [`NormalizedConfig`]: the canonical nested form with
//!   no dotted keys and no nulls. Every normalized config converts losslessly
//!   into a [`Config`].
//!
//! Maps are ordered by key so that output is deterministic.
//!
//! # Examples
//!
//! ```
//! use config_format::{Config, ConfigValue};
//! use serde_json::json;
//!
//! let config = Config::try_from(json!({
//!     "auth.allowSignUp": false,
//!     "teams": { "allowClientTeamCreation": true },
//! }))?;
//!
//! assert_eq!(config.get("auth.allowSignUp"), Some(&ConfigValue::Boolean(false)));
//! assert!(config.get("teams").is_some_and(ConfigValue::is_object_like));
//! # Ok::<(), config_format::FormatError>(())
//! ```

use crate::errors::FormatError;
use crate::validation::{get_invalid_json_config_reason, DEFAULT_CONFIG_NAME};
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::{Number, Value};
use std::collections::{btree_map, BTreeMap};
use std::fmt;

/// An unnormalized configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    String(String),
    Number(Number),
    Boolean(bool),
    /// Requests deletion of the key it is assigned to.
    Null,
    Array(Vec<ConfigValue>),
    Object(Config),
}

impl ConfigValue {
    /// Returns true for [`ConfigValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Returns true for objects and arrays, the values dot notation can descend into.
    pub fn is_object_like(&self) -> bool {
        matches!(self, ConfigValue::Object(_) | ConfigValue::Array(_))
    }

    pub fn as_object(&self) -> Option<&Config> {
        match self {
            ConfigValue::Object(config) => Some(config),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Config> {
        match self {
            ConfigValue::Object(config) => Some(config),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Short name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::String(_) => "string",
            ConfigValue::Number(_) => "number",
            ConfigValue::Boolean(_) => "boolean",
            ConfigValue::Null => "null",
            ConfigValue::Array(_) => "array",
            ConfigValue::Object(_) => "object",
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Boolean(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Number(value.into())
    }
}

impl From<u64> for ConfigValue {
    fn from(value: u64) -> Self {
        ConfigValue::Number(value.into())
    }
}

impl From<f64> for ConfigValue {
    /// Non-finite floats have no JSON representation and become `Null`.
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(ConfigValue::Null, ConfigValue::Number)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(value: Vec<ConfigValue>) -> Self {
        ConfigValue::Array(value)
    }
}

impl From<Config> for ConfigValue {
    fn from(value: Config) -> Self {
        ConfigValue::Object(value)
    }
}

impl From<Value> for ConfigValue {
    /// Converts any JSON value. Object keys are not checked here; use
    /// [`Config::try_from`] for a validated top-level document.
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ConfigValue::Null,
            Value::Bool(b) => ConfigValue::Boolean(b),
            Value::Number(n) => ConfigValue::Number(n),
            Value::String(s) => ConfigValue::String(s),
            Value::Array(items) => {
                ConfigValue::Array(items.into_iter().map(ConfigValue::from).collect())
            }
            Value::Object(map) => ConfigValue::Object(
                map.into_iter()
                    .map(|(key, value)| (key, ConfigValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&ConfigValue> for Value {
    fn from(value: &ConfigValue) -> Self {
        match value {
            ConfigValue::String(s) => Value::String(s.clone()),
            ConfigValue::Number(n) => Value::Number(n.clone()),
            ConfigValue::Boolean(b) => Value::Bool(*b),
            ConfigValue::Null => Value::Null,
            ConfigValue::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            ConfigValue::Object(config) => Value::from(config),
        }
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigValue::String(s) => serializer.serialize_str(s),
            ConfigValue::Number(n) => n.serialize(serializer),
            ConfigValue::Boolean(b) => serializer.serialize_bool(*b),
            ConfigValue::Null => serializer.serialize_unit(),
            ConfigValue::Array(items) => serializer.collect_seq(items),
            ConfigValue::Object(config) => config.serialize(serializer),
        }
    }
}

/// A possibly-dotted, possibly-null configuration document.
///
/// Each entry is either a value or *absent*. Absent entries are skipped by
/// every operation; they let a document name a key without expressing an
/// opinion about it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    entries: BTreeMap<String, Option<ConfigValue>>,
}

impl Config {
    /// Creates an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Config::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style [`Config::insert_absent`].
    pub fn with_absent(mut self, key: impl Into<String>) -> Self {
        self.insert_absent(key);
        self
    }

    /// Sets `key` to `value`, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.entries.insert(key.into(), Some(value.into()));
    }

    /// Records `key` as absent, replacing any previous entry.
    pub fn insert_absent(&mut self, key: impl Into<String>) {
        self.entries.insert(key.into(), None);
    }

    /// Removes the entry for `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.entries.remove(key).flatten()
    }

    /// The value stored at `key`, if present and not absent.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ConfigValue> {
        self.entries.get_mut(key).and_then(Option::as_mut)
    }

    /// Returns true if an entry exists for `key` and holds a value.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns true if an entry exists for `key`, absent or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns true if `key` is recorded as absent.
    pub fn is_absent(&self, key: &str) -> bool {
        matches!(self.entries.get(key), Some(None))
    }

    /// All entries in key order, including absent ones.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ConfigValue>)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_ref()))
    }

    /// Entries that hold a value, in key order.
    pub fn present(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries
            .iter()
            .filter_map(|(key, value)| value.as_ref().map(|value| (key.as_str(), value)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries, including absent ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keeps only the entries whose key satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.entries.retain(|key, _| keep(key));
    }
}

impl FromIterator<(String, ConfigValue)> for Config {
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key, Some(value)))
                .collect(),
        }
    }
}

impl FromIterator<(String, Option<ConfigValue>)> for Config {
    fn from_iter<I: IntoIterator<Item = (String, Option<ConfigValue>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Config {
    type Item = (String, Option<ConfigValue>);
    type IntoIter = btree_map::IntoIter<String, Option<ConfigValue>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl TryFrom<Value> for Config {
    type Error = FormatError;

    /// Accepts a JSON object whose keys and nested values form a valid config.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if let Some(reason) = get_invalid_json_config_reason(&value, DEFAULT_CONFIG_NAME) {
            return Err(FormatError::InvalidConfig { reason });
        }
        match ConfigValue::from(value) {
            ConfigValue::Object(config) => Ok(config),
            other => Err(FormatError::InvariantViolation {
                message: format!(
                    "validated config converted to a {} instead of an object",
                    other.type_name()
                ),
            }),
        }
    }
}

impl From<&Config> for Value {
    /// Absent entries are dropped.
    fn from(config: &Config) -> Self {
        Value::Object(
            config
                .present()
                .map(|(key, value)| (key.to_string(), Value::from(value)))
                .collect(),
        )
    }
}

impl Serialize for Config {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.present())
    }
}

impl<'de> Deserialize<'de> for Config {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Config::try_from(value).map_err(de::Error::custom)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// A value in normalized form: no nulls, no dotted keys.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedValue {
    String(String),
    Number(Number),
    Boolean(bool),
    Array(Vec<NormalizedValue>),
    Object(NormalizedConfig),
}

impl NormalizedValue {
    pub fn as_object(&self) -> Option<&NormalizedConfig> {
        match self {
            NormalizedValue::Object(config) => Some(config),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut NormalizedConfig> {
        match self {
            NormalizedValue::Object(config) => Some(config),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[NormalizedValue]> {
        match self {
            NormalizedValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NormalizedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            NormalizedValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for NormalizedValue {
    fn from(value: &str) -> Self {
        NormalizedValue::String(value.to_string())
    }
}

impl From<bool> for NormalizedValue {
    fn from(value: bool) -> Self {
        NormalizedValue::Boolean(value)
    }
}

impl From<NormalizedConfig> for NormalizedValue {
    fn from(value: NormalizedConfig) -> Self {
        NormalizedValue::Object(value)
    }
}

impl From<NormalizedValue> for ConfigValue {
    fn from(value: NormalizedValue) -> Self {
        match value {
            NormalizedValue::String(s) => ConfigValue::String(s),
            NormalizedValue::Number(n) => ConfigValue::Number(n),
            NormalizedValue::Boolean(b) => ConfigValue::Boolean(b),
            NormalizedValue::Array(items) => {
                ConfigValue::Array(items.into_iter().map(ConfigValue::from).collect())
            }
            NormalizedValue::Object(config) => ConfigValue::Object(config.into()),
        }
    }
}

impl TryFrom<Value> for NormalizedValue {
    type Error = FormatError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::Null => {
                return Err(FormatError::InvalidConfig {
                    reason: "normalized values must not be null".to_string(),
                })
            }
            Value::Bool(b) => NormalizedValue::Boolean(b),
            Value::Number(n) => NormalizedValue::Number(n),
            Value::String(s) => NormalizedValue::String(s),
            Value::Array(items) => NormalizedValue::Array(
                items
                    .into_iter()
                    .map(NormalizedValue::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(_) => NormalizedValue::Object(NormalizedConfig::try_from(value)?),
        })
    }
}

impl From<&NormalizedValue> for Value {
    fn from(value: &NormalizedValue) -> Self {
        match value {
            NormalizedValue::String(s) => Value::String(s.clone()),
            NormalizedValue::Number(n) => Value::Number(n.clone()),
            NormalizedValue::Boolean(b) => Value::Bool(*b),
            NormalizedValue::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            NormalizedValue::Object(config) => Value::from(config),
        }
    }
}

impl Serialize for NormalizedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NormalizedValue::String(s) => serializer.serialize_str(s),
            NormalizedValue::Number(n) => n.serialize(serializer),
            NormalizedValue::Boolean(b) => serializer.serialize_bool(*b),
            NormalizedValue::Array(items) => serializer.collect_seq(items),
            NormalizedValue::Object(config) => config.serialize(serializer),
        }
    }
}

/// A fully nested configuration without dotted keys or nulls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedConfig {
    entries: BTreeMap<String, NormalizedValue>,
}

impl NormalizedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`NormalizedConfig::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<NormalizedValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<NormalizedValue>,
    ) -> Option<NormalizedValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<NormalizedValue> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&NormalizedValue> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut NormalizedValue> {
        self.entries.get_mut(key)
    }

    /// Follows `segments` through nested objects.
    pub fn get_path(&self, segments: &[&str]) -> Option<&NormalizedValue> {
        let (first, rest) = segments.split_first()?;
        let value = self.get(first)?;
        if rest.is_empty() {
            return Some(value);
        }
        value.as_object()?.get_path(rest)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NormalizedValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.entries.retain(|key, _| keep(key));
    }
}

impl FromIterator<(String, NormalizedValue)> for NormalizedConfig {
    fn from_iter<I: IntoIterator<Item = (String, NormalizedValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for NormalizedConfig {
    type Item = (String, NormalizedValue);
    type IntoIter = btree_map::IntoIter<String, NormalizedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl From<NormalizedConfig> for Config {
    fn from(config: NormalizedConfig) -> Self {
        config
            .into_iter()
            .map(|(key, value)| (key, ConfigValue::from(value)))
            .collect()
    }
}

impl TryFrom<Value> for NormalizedConfig {
    type Error = FormatError;

    /// Accepts a JSON object that is already in normalized form at every depth.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(map) = value else {
            return Err(FormatError::InvalidConfig {
                reason: format!("{DEFAULT_CONFIG_NAME} must be a non-null object"),
            });
        };
        map.into_iter()
            .map(|(key, value)| {
                if !crate::path::is_valid_segment(&key) {
                    return Err(FormatError::InvalidConfig {
                        reason: format!("normalized keys must be single valid segments (found: {key})"),
                    });
                }
                Ok((key, NormalizedValue::try_from(value)?))
            })
            .collect()
    }
}

impl From<&NormalizedConfig> for Value {
    fn from(config: &NormalizedConfig) -> Self {
        Value::Object(
            config
                .iter()
                .map(|(key, value)| (key.to_string(), Value::from(value)))
                .collect(),
        )
    }
}

impl Serialize for NormalizedConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for NormalizedConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        NormalizedConfig::try_from(value).map_err(de::Error::custom)
    }
}

impl fmt::Display for NormalizedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
