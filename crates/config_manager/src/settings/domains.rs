//! Domain policy.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Domain settings available to a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BranchDomainSettings {
    /// Accept callbacks on `localhost`.
    pub allow_localhost: Option<bool>,
}

/// A domain that auth callbacks may redirect to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TrustedDomain {
    pub base_url: Option<String>,
    pub handler_path: Option<String>,
}

/// Domain settings available to an environment.
///
/// Trusted domains are keyed by an arbitrary id. Older overrides stored them
/// as an array, which migration rewrites into this record form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnvironmentDomainSettings {
    pub allow_localhost: Option<bool>,
    pub trusted_domains: Option<BTreeMap<String, TrustedDomain>>,
}

#[cfg(test)]
#[path = "domains_tests.rs"]
mod tests;
