//! Role-based access control settings.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A set of permission ids. Only `true` entries are meaningful.
///
/// Ids match `^\$?[a-z0-9_:]+$`; a leading `$` marks a built-in permission.
pub type PermissionSet = BTreeMap<String, bool>;

/// Whether a permission applies to teams or to the whole project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PermissionScope {
    Team,
    Project,
}

/// A custom permission definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PermissionDefinition {
    pub description: Option<String>,
    pub scope: Option<PermissionScope>,

    /// Permissions implied by this one.
    #[schemars(extend("propertyNames" = { "pattern": "^\\$?[a-z0-9_:]+$" }))]
    pub contained_permission_ids: Option<PermissionSet>,
}

/// Permissions granted automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DefaultPermissions {
    /// Granted to the user who creates a team.
    #[schemars(extend("propertyNames" = { "pattern": "^\\$?[a-z0-9_:]+$" }))]
    pub team_creator: Option<PermissionSet>,

    /// Granted to every member joining a team.
    #[schemars(extend("propertyNames" = { "pattern": "^\\$?[a-z0-9_:]+$" }))]
    pub team_member: Option<PermissionSet>,

    /// Granted to every user on sign-up.
    #[schemars(extend("propertyNames" = { "pattern": "^\\$?[a-z0-9_:]+$" }))]
    pub sign_up: Option<PermissionSet>,
}

/// RBAC configuration.
///
/// # Examples
///
/// ```rust
/// use config_manager::settings::RbacSettings;
///
/// let rbac: RbacSettings = serde_json::from_str(
///     r#"{ "permissions": { "read:docs": { "scope": "team" } } }"#,
/// ).unwrap();
/// assert!(rbac.permissions.unwrap().contains_key("read:docs"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RbacSettings {
    /// Custom permissions. Ids cannot start with `$`.
    #[schemars(extend("propertyNames" = { "pattern": "^[a-z0-9_:]+$" }))]
    pub permissions: Option<BTreeMap<String, PermissionDefinition>>,
    pub default_permissions: Option<DefaultPermissions>,
}

#[cfg(test)]
#[path = "rbac_tests.rs"]
mod tests;
