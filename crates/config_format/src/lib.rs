//! Configuration format engine for TenantConfig
//!
//! Tenant settings are written as partial override documents that may use
//! dot-notation shorthand (`"auth.oauth.providers.google.type": "standard"`)
//! and `null` as a deletion marker. This crate provides the pure, synchronous
//! core that turns such documents into resolved configuration:
//!
//! - [`value`]: the recursive value model ([`Config`], [`NormalizedConfig`])
//! - [`validation`]: structural validation of keys and values
//! - [`overrides`]: layering one config on top of another with shadow-clearing
//! - [`normalize`](mod@normalize): expanding dotted keys and resolving deletions
//!
//! No function in this crate mutates its inputs.
//!
//! # Examples
//!
//! ```
//! use config_format::{normalize, override_config, Config, NormalizeOptions};
//! use serde_json::{json, Value};
//!
//! let parent = Config::try_from(json!({"teams": {"allowClientTeamCreation": false}}))?;
//! let child = Config::try_from(json!({"teams.allowClientTeamCreation": true}))?;
//!
//! let merged = override_config(&parent, &child)?;
//! let resolved = normalize(&merged, NormalizeOptions::default())?;
//!
//! assert_eq!(
//!     Value::from(&resolved),
//!     json!({"teams": {"allowClientTeamCreation": true}})
//! );
//! # Ok::<(), config_format::FormatError>(())
//! ```

pub mod errors;
pub mod normalize;
pub mod overrides;
pub mod path;
pub mod validation;
pub mod value;

pub use errors::{FormatError, FormatResult, NormalizationError};
pub use normalize::{
    assert_normalized, is_normalized, normalize, DotIntoNonObject, DotIntoNull, NormalizeOptions,
};
pub use overrides::{override_all, override_config};
pub use path::{is_valid_key, is_valid_segment, KeyPath};
pub use validation::{
    assert_valid_config, get_invalid_config_reason, get_invalid_json_config_reason,
    is_valid_config, is_valid_json_config,
};
pub use value::{Config, ConfigValue, NormalizedConfig, NormalizedValue};
