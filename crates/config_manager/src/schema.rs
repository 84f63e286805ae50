//! JSON Schema stack for the configuration levels.
//!
//! Each level's schema is generated from its typed settings document with
//! `schemars` and compiled with `jsonschema`. From every full schema the
//! registry also derives an **override schema**: the shape a partial override
//! is allowed to take before it is merged with its parent.
//!
//! # Override Schema
//!
//! The override schema is a mechanical rewrite of the full schema:
//!
//! - `required` is dropped, so every field is optional
//! - value constraints (formats, ranges, patterns) are dropped, keeping only
//!   `type`, `enum` and `const`
//! - object variants of a union are merged into a single object whose fields
//!   accept any of the variants' field schemas
//! - every nested node also accepts `null`, the deletion sentinel
//!
//! Cross-field rules cannot be checked on an override, since they depend on
//! the base config it will be applied to. Those are checked later against the
//! full schema and reported as warnings.
//!
//! # Examples
//!
//! ```rust
//! use config_manager::{ConfigLevel, SchemaRegistry};
//!
//! let registry = SchemaRegistry::new()?;
//!
//! assert!(registry.sub_schema(ConfigLevel::Branch, "auth.oauth.providers.google.allowSignIn").is_some());
//! assert!(registry.sub_schema(ConfigLevel::Branch, "auth.unknown").is_none());
//! # Ok::<(), config_manager::ConfigurationError>(())
//! ```

use crate::{
    errors::{ConfigurationError, ConfigurationResult},
    hierarchy::ConfigLevel,
    settings::{BranchConfig, EnvironmentConfig, OrganizationConfig, ProjectConfig},
};
use config_format::{path::SEGMENT_SEPARATOR, NormalizedConfig};
use jsonschema::Validator;
use schemars::{schema_for, JsonSchema};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;

const DEFS_KEYWORD: &str = "$defs";
const DEFS_PREFIX: &str = "#/$defs/";

/// Keywords the override schema keeps verbatim.
const KEPT_KEYWORDS: [&str; 4] = ["type", "enum", "const", "$ref"];

/// Schemas for a single level.
struct LevelSchema {
    json_schema: Value,
    override_schema: Value,
    validator: Validator,
}

/// Generated and compiled schemas for every configuration level.
///
/// Building the registry generates and compiles all schemas up front; after
/// that every lookup is infallible apart from compiling ad-hoc sub-schemas.
pub struct SchemaRegistry {
    // Indexed by `ConfigLevel as usize`.
    levels: Vec<LevelSchema>,
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("levels", &ConfigLevel::ALL)
            .finish_non_exhaustive()
    }
}

impl SchemaRegistry {
    /// Generates and compiles the schemas of every level.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::SchemaCompilation` if a generated schema
    /// cannot be serialized or compiled.
    pub fn new() -> ConfigurationResult<Self> {
        let levels = ConfigLevel::ALL
            .into_iter()
            .map(|level| {
                debug!("Generating schema for {} level", level);
                let json_schema = match level {
                    ConfigLevel::Project => generate_schema::<ProjectConfig>(level)?,
                    ConfigLevel::Branch => generate_schema::<BranchConfig>(level)?,
                    ConfigLevel::Environment => generate_schema::<EnvironmentConfig>(level)?,
                    ConfigLevel::Organization => generate_schema::<OrganizationConfig>(level)?,
                };
                let override_schema = build_override_schema(&json_schema);
                let validator = compile_schema(level, &json_schema)?;
                Ok(LevelSchema {
                    json_schema,
                    override_schema,
                    validator,
                })
            })
            .collect::<ConfigurationResult<Vec<_>>>()?;

        Ok(Self { levels })
    }

    fn level(&self, level: ConfigLevel) -> &LevelSchema {
        &self.levels[level as usize]
    }

    /// The full JSON Schema of a level's normalized config.
    pub fn json_schema(&self, level: ConfigLevel) -> &Value {
        &self.level(level).json_schema
    }

    /// The schema a partial override for `level` must satisfy.
    pub fn override_schema(&self, level: ConfigLevel) -> &Value {
        &self.level(level).override_schema
    }

    /// Top-level fields of the level's schema.
    pub fn top_level_keys(&self, level: ConfigLevel) -> Vec<&str> {
        self.json_schema(level)
            .get("properties")
            .and_then(Value::as_object)
            .map(|properties| properties.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Top-level fields present in the schema that the level may no longer override.
    pub fn no_longer_overridable_keys(&self, level: ConfigLevel) -> &'static [&'static str] {
        level.no_longer_overridable_keys()
    }

    /// Looks up the override schema for a dotted key.
    ///
    /// Segments are resolved through object properties, record values and the
    /// members of unions. The returned schema is self-contained: it carries
    /// the level's `$defs` so that references keep resolving.
    ///
    /// # Arguments
    ///
    /// * `level` - The level whose override schema is searched
    /// * `key` - A dotted config key such as `auth.oauth.providers.google`
    ///
    /// # Returns
    ///
    /// `None` if any segment of the key is unknown to the schema.
    pub fn sub_schema(&self, level: ConfigLevel, key: &str) -> Option<Value> {
        let root = self.override_schema(level);
        let defs = root.get(DEFS_KEYWORD).and_then(Value::as_object);

        let mut node = root;
        for segment in key.split(SEGMENT_SEPARATOR) {
            node = child_schema(defs, node, segment)?;
        }

        let mut schema = Map::new();
        if let Some(defs) = defs {
            schema.insert(DEFS_KEYWORD.to_string(), Value::Object(defs.clone()));
        }
        schema.insert("allOf".to_string(), json!([node]));
        Some(Value::Object(schema))
    }

    /// Validates a JSON document against the level's full schema.
    ///
    /// # Returns
    ///
    /// One message per violation. An empty list means the document is valid.
    pub fn schema_errors(&self, level: ConfigLevel, document: &Value) -> Vec<String> {
        self.level(level)
            .validator
            .iter_errors(document)
            .map(|error| error.to_string())
            .collect()
    }

    /// Validates a normalized config against the level's full schema.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::SchemaViolation` listing every violation.
    pub fn validate_normalized(
        &self,
        level: ConfigLevel,
        config: &NormalizedConfig,
    ) -> ConfigurationResult<()> {
        let errors = self.schema_errors(level, &Value::from(config));
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigurationError::SchemaViolation {
                level,
                reason: errors.join("; "),
            })
        }
    }
}

/// A normalized config that passed a level's schema, in typed form.
///
/// Fields introduced by later levels are not part of the type; values for
/// them are filled in once the later level is resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum IncompleteConfig {
    Project(ProjectConfig),
    Branch(BranchConfig),
    Environment(EnvironmentConfig),
    Organization(OrganizationConfig),
}

impl IncompleteConfig {
    pub fn level(&self) -> ConfigLevel {
        match self {
            IncompleteConfig::Project(_) => ConfigLevel::Project,
            IncompleteConfig::Branch(_) => ConfigLevel::Branch,
            IncompleteConfig::Environment(_) => ConfigLevel::Environment,
            IncompleteConfig::Organization(_) => ConfigLevel::Organization,
        }
    }
}

/// Parses a normalized config into the typed document of `level`.
///
/// # Errors
///
/// Returns `ConfigurationError::SchemaViolation` if the config does not fit
/// the level's settings types.
pub fn parse_incomplete_config(
    level: ConfigLevel,
    config: &NormalizedConfig,
) -> ConfigurationResult<IncompleteConfig> {
    let document = Value::from(config);
    let violation = |e: serde_json::Error| ConfigurationError::SchemaViolation {
        level,
        reason: e.to_string(),
    };

    Ok(match level {
        ConfigLevel::Project => {
            IncompleteConfig::Project(serde_json::from_value(document).map_err(violation)?)
        }
        ConfigLevel::Branch => {
            IncompleteConfig::Branch(serde_json::from_value(document).map_err(violation)?)
        }
        ConfigLevel::Environment => {
            IncompleteConfig::Environment(serde_json::from_value(document).map_err(violation)?)
        }
        ConfigLevel::Organization => {
            IncompleteConfig::Organization(serde_json::from_value(document).map_err(violation)?)
        }
    })
}

fn generate_schema<T: JsonSchema>(level: ConfigLevel) -> ConfigurationResult<Value> {
    let schema = schema_for!(T);
    serde_json::to_value(&schema).map_err(|e| ConfigurationError::SchemaCompilation {
        level,
        reason: format!("Failed to serialize schema: {}", e),
    })
}

/// Compiles a schema for validation.
pub(crate) fn compile_schema(level: ConfigLevel, schema: &Value) -> ConfigurationResult<Validator> {
    jsonschema::validator_for(schema).map_err(|e| ConfigurationError::SchemaCompilation {
        level,
        reason: e.to_string(),
    })
}

fn build_override_schema(schema: &Value) -> Value {
    let mut restricted = restrict(schema);
    if let (Value::Object(root), Some(Value::Object(defs))) =
        (&mut restricted, schema.get(DEFS_KEYWORD))
    {
        let defs: Map<String, Value> = defs
            .iter()
            .map(|(name, def)| (name.clone(), restrict(def)))
            .collect();
        root.insert(DEFS_KEYWORD.to_string(), Value::Object(defs));
    }
    restricted
}

fn nullable(schema: Value) -> Value {
    json!({ "anyOf": [schema, { "type": "null" }] })
}

/// Rewrites one schema node into its override form. Nullability is added
/// where a node is used as a child, so the root itself stays non-null.
fn restrict(node: &Value) -> Value {
    let Value::Object(map) = node else {
        return node.clone();
    };

    if let Some(variants) = map
        .get("anyOf")
        .or_else(|| map.get("oneOf"))
        .and_then(Value::as_array)
    {
        return restrict_union(variants);
    }

    let mut restricted = Map::new();
    for keyword in KEPT_KEYWORDS {
        if let Some(value) = map.get(keyword) {
            restricted.insert(keyword.to_string(), value.clone());
        }
    }

    if let Some(Value::Object(properties)) = map.get("properties") {
        let properties: Map<String, Value> = properties
            .iter()
            .map(|(key, schema)| (key.clone(), nullable(restrict(schema))))
            .collect();
        restricted.insert("properties".to_string(), Value::Object(properties));
    }

    for keyword in ["additionalProperties", "items"] {
        match map.get(keyword) {
            Some(schema @ Value::Object(_)) => {
                restricted.insert(keyword.to_string(), nullable(restrict(schema)));
            }
            Some(other) => {
                restricted.insert(keyword.to_string(), other.clone());
            }
            None => {}
        }
    }

    Value::Object(restricted)
}

fn restrict_union(variants: &[Value]) -> Value {
    let (objects, others): (Vec<&Value>, Vec<&Value>) = variants
        .iter()
        .partition(|variant| variant.get("properties").is_some());

    let mut members: Vec<Value> = others.into_iter().map(restrict).collect();
    if !objects.is_empty() {
        members.push(restrict(&merge_object_variants(&objects)));
    }

    match members.len() {
        0 => Value::Bool(false),
        1 => members.remove(0),
        _ => json!({ "anyOf": members }),
    }
}

/// Merges object variants into one object accepting the union of their fields.
fn merge_object_variants(objects: &[&Value]) -> Value {
    let mut fields: BTreeMap<String, Vec<Value>> = BTreeMap::new();
    for object in objects {
        if let Some(Value::Object(properties)) = object.get("properties") {
            for (key, schema) in properties {
                fields.entry(key.clone()).or_default().push(schema.clone());
            }
        }
    }

    let properties: Map<String, Value> = fields
        .into_iter()
        .map(|(key, mut schemas)| {
            let schema = if schemas.len() == 1 {
                schemas.remove(0)
            } else {
                json!({ "anyOf": schemas })
            };
            (key, schema)
        })
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "additionalProperties": false,
    })
}

fn child_schema<'a>(
    defs: Option<&'a Map<String, Value>>,
    node: &'a Value,
    segment: &str,
) -> Option<&'a Value> {
    if let Some(reference) = node.get("$ref").and_then(Value::as_str) {
        let target = reference
            .strip_prefix(DEFS_PREFIX)
            .and_then(|name| defs?.get(name))?;
        return child_schema(defs, target, segment);
    }

    if let Some(child) = node.get("properties").and_then(|p| p.get(segment)) {
        return Some(child);
    }
    if let Some(child) = node.get("additionalProperties").filter(|s| s.is_object()) {
        return Some(child);
    }
    if let Some(child) = node.get("items").filter(|s| s.is_object()) {
        if segment.parse::<usize>().is_ok() {
            return Some(child);
        }
    }

    node.get("anyOf")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .find_map(|variant| child_schema(defs, variant, segment))
}
