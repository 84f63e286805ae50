//! Database connection policy for a project.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a project's data lives.
///
/// Only configurable at the project level. Every later level inherits it and
/// can no longer override it.
///
/// # Examples
///
/// ```rust
/// use config_manager::settings::SourceOfTruth;
///
/// let source: SourceOfTruth = serde_json::from_str(
///     r#"{ "type": "postgres", "connectionString": "postgres://db" }"#,
/// ).unwrap();
/// assert_eq!(source.type_name(), "postgres");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceOfTruth {
    #[default]
    Hosted,
    Neon {
        #[serde(rename = "connectionStrings")]
        connection_strings: BTreeMap<String, String>,
    },
    Postgres {
        #[serde(rename = "connectionString")]
        connection_string: String,
    },
}

impl SourceOfTruth {
    /// The value of the `type` tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            SourceOfTruth::Hosted => "hosted",
            SourceOfTruth::Neon { .. } => "neon",
            SourceOfTruth::Postgres { .. } => "postgres",
        }
    }
}

#[cfg(test)]
#[path = "source_of_truth_tests.rs"]
mod tests;
