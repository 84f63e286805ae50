//! Team, user and API key settings.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Team creation policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TeamSettings {
    /// Create a personal team for every new user.
    pub create_personal_team_on_sign_up: Option<bool>,

    /// Allow clients to create teams without a server call.
    pub allow_client_team_creation: Option<bool>,
}

/// User management policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserSettings {
    pub allow_client_user_deletion: Option<bool>,
}

/// Which owners may hold API keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApiKeyOwners {
    pub team: Option<bool>,
    pub user: Option<bool>,
}

/// API key settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApiKeySettings {
    pub enabled: Option<ApiKeyOwners>,
}

#[cfg(test)]
#[path = "teams_tests.rs"]
mod tests;
