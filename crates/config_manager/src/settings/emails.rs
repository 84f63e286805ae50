//! Email theme, template and delivery settings.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A renderable email theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EmailTheme {
    pub display_name: Option<String>,
    pub tsx_source: Option<String>,
}

/// A renderable email template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EmailTemplate {
    pub display_name: Option<String>,

    /// Theme to render with. Falls back to the selected theme when unset.
    pub theme_id: Option<String>,
    pub tsx_source: Option<String>,
}

/// Email settings available to a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BranchEmailSettings {
    pub selected_theme_id: Option<String>,
    pub themes: Option<BTreeMap<String, EmailTheme>>,
    pub templates: Option<BTreeMap<String, EmailTemplate>>,
}

/// SMTP delivery settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EmailServer {
    /// Send through the shared mail server and ignore the fields below.
    pub is_shared: Option<bool>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
}

/// Email settings available to an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnvironmentEmailSettings {
    pub selected_theme_id: Option<String>,
    pub themes: Option<BTreeMap<String, EmailTheme>>,
    pub templates: Option<BTreeMap<String, EmailTemplate>>,
    pub server: Option<EmailServer>,
}

#[cfg(test)]
#[path = "emails_tests.rs"]
mod tests;
