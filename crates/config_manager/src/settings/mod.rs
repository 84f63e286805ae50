//! Typed settings for each configuration level.
//!
//! These types describe the shape of a fully normalized configuration. They
//! drive the JSON schemas in [`crate::schema`] and are the typed form an
//! incomplete config is parsed into.

pub mod auth;
pub mod domains;
pub mod emails;
pub mod levels;
pub mod rbac;
pub mod source_of_truth;
pub mod teams;

// Re-export all types for convenient access
pub use auth::{
    AccountMergeStrategy, AuthSettings, BranchAuthSettings, BranchOAuthProvider,
    EnvironmentAuthSettings, EnvironmentOAuthProvider, OAuthProviderType, OAuthSettings,
    SignInMethod,
};
pub use domains::{BranchDomainSettings, EnvironmentDomainSettings, TrustedDomain};
pub use emails::{
    BranchEmailSettings, EmailServer, EmailTemplate, EmailTheme, EnvironmentEmailSettings,
};
pub use levels::{BranchConfig, EnvironmentConfig, OrganizationConfig, ProjectConfig};
pub use rbac::{DefaultPermissions, PermissionDefinition, PermissionScope, PermissionSet, RbacSettings};
pub use source_of_truth::SourceOfTruth;
pub use teams::{ApiKeyOwners, ApiKeySettings, TeamSettings, UserSettings};
