//! Authentication method settings.
//!
//! The same shape is used by branches and environments; only the OAuth
//! provider entries differ. Environments no longer share infrastructure
//! across branches, so their providers carry client credentials.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Supported OAuth provider kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProviderType {
    Google,
    Github,
    Microsoft,
    Spotify,
    Facebook,
    Discord,
    Gitlab,
    Bitbucket,
    Linkedin,
    Apple,
    X,
    Twitch,
}

/// How to handle a sign-in whose email matches an existing account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccountMergeStrategy {
    LinkMethod,
    RaiseError,
    AllowDuplicates,
}

/// A toggle for a single sign-in method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SignInMethod {
    pub allow_sign_in: Option<bool>,
}

/// An OAuth provider as configured on a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BranchOAuthProvider {
    #[serde(rename = "type")]
    pub provider_type: Option<OAuthProviderType>,
    pub allow_sign_in: Option<bool>,
    pub allow_connected_accounts: Option<bool>,
}

/// An OAuth provider as configured on an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnvironmentOAuthProvider {
    #[serde(rename = "type")]
    pub provider_type: Option<OAuthProviderType>,

    /// Use the shared development credentials instead of `client_id`.
    pub is_shared: Option<bool>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub facebook_config_id: Option<String>,
    pub microsoft_tenant_id: Option<String>,
    pub allow_sign_in: Option<bool>,
    pub allow_connected_accounts: Option<bool>,
}

/// OAuth settings, generic over the provider entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OAuthSettings<P> {
    pub account_merge_strategy: Option<AccountMergeStrategy>,
    #[schemars(extend("propertyNames" = { "pattern": "^\\$?[a-z0-9_:]+$" }))]
    pub providers: Option<BTreeMap<String, P>>,
}

impl<P> Default for OAuthSettings<P> {
    fn default() -> Self {
        Self {
            account_merge_strategy: None,
            providers: None,
        }
    }
}

/// Authentication settings, generic over the OAuth provider entry.
///
/// # Examples
///
/// ```rust
/// use config_manager::settings::{AuthSettings, BranchOAuthProvider};
///
/// let auth: AuthSettings<BranchOAuthProvider> = serde_json::from_str(
///     r#"{ "allowSignUp": false, "password": { "allowSignIn": true } }"#,
/// ).unwrap();
/// assert_eq!(auth.allow_sign_up, Some(false));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AuthSettings<P> {
    pub allow_sign_up: Option<bool>,
    pub password: Option<SignInMethod>,
    pub otp: Option<SignInMethod>,
    pub passkey: Option<SignInMethod>,
    pub oauth: Option<OAuthSettings<P>>,
}

impl<P> Default for AuthSettings<P> {
    fn default() -> Self {
        Self {
            allow_sign_up: None,
            password: None,
            otp: None,
            passkey: None,
            oauth: None,
        }
    }
}

/// Auth settings as seen by a branch.
pub type BranchAuthSettings = AuthSettings<BranchOAuthProvider>;

/// Auth settings as seen by an environment.
pub type EnvironmentAuthSettings = AuthSettings<EnvironmentOAuthProvider>;

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
