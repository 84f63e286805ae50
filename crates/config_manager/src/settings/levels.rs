//! Complete settings documents for each configuration level.
//!
//! Each level's document is its parent's plus the fields it introduces.
//! Environments widen the branch auth, domain and email sections; the
//! organization level reuses the environment document unchanged.

use super::{
    ApiKeySettings, BranchAuthSettings, BranchDomainSettings, BranchEmailSettings,
    EnvironmentAuthSettings, EnvironmentDomainSettings, EnvironmentEmailSettings, RbacSettings,
    SourceOfTruth, TeamSettings, UserSettings,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Settings only a project may set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectConfig {
    pub source_of_truth: Option<SourceOfTruth>,
}

/// Settings a branch may set, plus the inherited project settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BranchConfig {
    pub source_of_truth: Option<SourceOfTruth>,
    pub rbac: Option<RbacSettings>,
    pub teams: Option<TeamSettings>,
    pub users: Option<UserSettings>,
    pub api_keys: Option<ApiKeySettings>,
    pub domains: Option<BranchDomainSettings>,
    pub auth: Option<BranchAuthSettings>,
    pub emails: Option<BranchEmailSettings>,
}

/// Settings an environment may set, plus everything inherited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnvironmentConfig {
    pub source_of_truth: Option<SourceOfTruth>,
    pub rbac: Option<RbacSettings>,
    pub teams: Option<TeamSettings>,
    pub users: Option<UserSettings>,
    pub api_keys: Option<ApiKeySettings>,
    pub domains: Option<EnvironmentDomainSettings>,
    pub auth: Option<EnvironmentAuthSettings>,
    pub emails: Option<EnvironmentEmailSettings>,
}

/// Organizations currently introduce no fields of their own.
pub type OrganizationConfig = EnvironmentConfig;

#[cfg(test)]
#[path = "levels_tests.rs"]
mod tests;
