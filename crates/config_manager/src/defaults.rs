//! Default values for each configuration level.
//!
//! Defaults describe what an unset field means. They are merged underneath a
//! config before it is normalized, so a field the config never mentions takes
//! its default value, while anything the config sets, including `null`,
//! wins.
//!
//! Record-shaped fields such as OAuth providers have no fixed set of keys.
//! Their defaults are a template applied to every key the config uses, plus
//! optional known entries that always exist.

use crate::hierarchy::ConfigLevel;
use config_format::{Config, ConfigValue, KeyPath, NormalizedConfig, NormalizedValue};
use std::collections::BTreeMap;
use tracing::debug;

#[cfg(test)]
#[path = "defaults_tests.rs"]
mod tests;

/// Id of the email theme selected when none (or an unknown one) is configured.
pub const DEFAULT_EMAIL_THEME_ID: &str = "default-light";

const DEFAULT_THEME_NAME: &str = "Unnamed Theme";
const DEFAULT_THEME_SOURCE: &str = "Error: Theme config is missing TypeScript source code.";
const DEFAULT_TEMPLATE_NAME: &str = "Unnamed Template";
const DEFAULT_TEMPLATE_SOURCE: &str = "Error: Template config is missing TypeScript source code.";

const BUILT_IN_THEMES: [(&str, &str, &str); 2] = [
    (
        "default-light",
        "Default Light",
        "export function EmailTheme({ children }) { return <Html><Body className=\"bg-white text-black\">{children}</Body></Html>; }",
    ),
    (
        "default-dark",
        "Default Dark",
        "export function EmailTheme({ children }) { return <Html><Body className=\"bg-black text-white\">{children}</Body></Html>; }",
    ),
];

const BUILT_IN_TEMPLATES: [(&str, &str, &str); 3] = [
    (
        "email-verification",
        "Email Verification",
        "export function EmailTemplate({ user, link }) { return <Text>Verify your email: {link}</Text>; }",
    ),
    (
        "password-reset",
        "Password Reset",
        "export function EmailTemplate({ user, link }) { return <Text>Reset your password: {link}</Text>; }",
    ),
    (
        "magic-link",
        "Magic Link",
        "export function EmailTemplate({ user, otp, link }) { return <Text>Your sign-in code is {otp}: {link}</Text>; }",
    ),
];

/// Email themes every organization has, keyed by theme id.
pub fn built_in_email_themes() -> NormalizedConfig {
    BUILT_IN_THEMES
        .iter()
        .map(|(id, name, source)| {
            let theme = NormalizedConfig::new()
                .with("displayName", *name)
                .with("tsxSource", *source);
            (id.to_string(), NormalizedValue::Object(theme))
        })
        .collect()
}

/// Email templates every organization has, keyed by template id.
pub fn built_in_email_templates() -> NormalizedConfig {
    BUILT_IN_TEMPLATES
        .iter()
        .map(|(id, name, source)| {
            let template = NormalizedConfig::new()
                .with("displayName", *name)
                .with("tsxSource", *source);
            (id.to_string(), NormalizedValue::Object(template))
        })
        .collect()
}

/// A tree of default values.
///
/// # Examples
///
/// ```rust
/// use config_format::Config;
/// use config_manager::defaults::{apply_defaults, Defaults};
///
/// let defaults = Defaults::object([("auth", Defaults::object([("allowSignUp", Defaults::value(true))]))]);
/// let config = Config::new().with("auth.otp", Config::new());
///
/// let applied = apply_defaults(&defaults, &config);
/// assert!(applied.get("auth").is_some());
/// assert!(applied.get("auth.otp").is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Defaults {
    /// A leaf default. Never an object; use `Object` for nested defaults.
    Value(ConfigValue),
    /// Defaults for a fixed set of fields.
    Object(BTreeMap<String, Defaults>),
    /// Defaults for a record: `template` applies to any key, `known`
    /// entries take precedence and always exist.
    Record {
        template: Box<Defaults>,
        known: BTreeMap<String, Defaults>,
    },
}

impl Defaults {
    pub fn value(value: impl Into<ConfigValue>) -> Self {
        Defaults::Value(value.into())
    }

    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Defaults)>) -> Self {
        Defaults::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// An object with no field defaults.
    pub fn empty() -> Self {
        Defaults::Object(BTreeMap::new())
    }

    pub fn record(template: Defaults) -> Self {
        Defaults::Record {
            template: Box::new(template),
            known: BTreeMap::new(),
        }
    }

    /// A record whose known entries are taken from a normalized config.
    pub fn record_with_known(template: Defaults, known: NormalizedConfig) -> Self {
        Defaults::Record {
            template: Box::new(template),
            known: known
                .into_iter()
                .map(|(key, value)| (key, Defaults::from(ConfigValue::from(value))))
                .collect(),
        }
    }

    fn is_object_like(&self) -> bool {
        !matches!(self, Defaults::Value(_))
    }

    /// Defaults for the field `part`, if any.
    pub fn child(&self, part: &str) -> Option<&Defaults> {
        match self {
            Defaults::Value(_) => None,
            Defaults::Object(fields) => fields.get(part),
            Defaults::Record { template, known } => {
                Some(known.get(part).unwrap_or(template.as_ref()))
            }
        }
    }

    /// The concrete value these defaults produce when nothing is set.
    ///
    /// Records contribute only their known entries.
    pub fn materialize(&self) -> ConfigValue {
        match self {
            Defaults::Value(value) => value.clone(),
            Defaults::Object(_) | Defaults::Record { .. } => {
                ConfigValue::Object(self.materialize_config())
            }
        }
    }

    fn materialize_config(&self) -> Config {
        let entries = match self {
            Defaults::Value(_) => return Config::new(),
            Defaults::Object(fields) => fields,
            Defaults::Record { known, .. } => known,
        };
        entries
            .iter()
            .map(|(key, defaults)| (key.clone(), defaults.materialize()))
            .collect()
    }
}

impl From<ConfigValue> for Defaults {
    fn from(value: ConfigValue) -> Self {
        match value {
            ConfigValue::Object(config) => Defaults::Object(
                config
                    .into_iter()
                    .filter_map(|(key, value)| value.map(|v| (key, Defaults::from(v))))
                    .collect(),
            ),
            other => Defaults::Value(other),
        }
    }
}

/// Merges `defaults` underneath `config`.
///
/// The result starts as the materialized defaults. Each present entry of the
/// config is then written over it under its literal key. Dotted keys are
/// followed through the defaults as far as they describe objects, and every
/// object on that path is materialized, so the dotted write lands on a fully
/// defaulted parent once normalized. Object values are merged with the defaults at
/// their path recursively. Arrays and primitives replace the default.
///
/// # Arguments
///
/// * `defaults` - The defaults tree
/// * `config` - The config to apply the defaults to; it is not modified
///
/// # Returns
///
/// A new `Config` that may mix nested and dotted keys. It is meant to be
/// normalized afterwards.
pub fn apply_defaults(defaults: &Defaults, config: &Config) -> Config {
    let mut result = defaults.materialize_config();

    for (key, value) in config.present() {
        let path = KeyPath::parse(key);

        let mut chain: Vec<(&str, &Defaults)> = Vec::with_capacity(path.depth());
        let mut base = Some(defaults);
        for part in path.segments() {
            match base.and_then(|b| b.child(part)).filter(|c| c.is_object_like()) {
                Some(child) => {
                    chain.push((*part, child));
                    base = Some(child);
                }
                None => {
                    base = None;
                    break;
                }
            }
        }

        materialize_path(&mut result, &chain);

        let merged = match (base, value) {
            (Some(base), ConfigValue::Object(nested)) => {
                ConfigValue::Object(apply_defaults(base, nested))
            }
            _ => value.clone(),
        };
        result.insert(key, merged);
    }

    result
}

/// Creates every missing object along `chain`, stopping at a non-object.
fn materialize_path(root: &mut Config, chain: &[(&str, &Defaults)]) {
    let mut node = root;
    for (part, defaults) in chain {
        if node.get(part).is_none() {
            node.insert(*part, defaults.materialize());
        }
        node = match node.get_mut(part).and_then(ConfigValue::as_object_mut) {
            Some(child) => child,
            None => return,
        };
    }
}

/// The defaults a level itself introduces.
pub fn level_defaults(level: ConfigLevel) -> Defaults {
    match level {
        ConfigLevel::Project => project_defaults(),
        ConfigLevel::Branch | ConfigLevel::Environment => Defaults::empty(),
        ConfigLevel::Organization => organization_defaults(),
    }
}

/// Applies the defaults of every level from the project up to `level`.
///
/// Project defaults are applied first, so each later level's defaults sit
/// on top of the earlier ones.
pub fn apply_level_defaults(level: ConfigLevel, config: &Config) -> Config {
    level
        .ancestors_and_self()
        .iter()
        .fold(config.clone(), |applied, &current| {
            debug!("Applying {} defaults", current);
            apply_defaults(&level_defaults(current), &applied)
        })
}

fn project_defaults() -> Defaults {
    Defaults::object([(
        "sourceOfTruth",
        Defaults::object([("type", Defaults::value("hosted"))]),
    )])
}

fn sign_in_disabled() -> Defaults {
    Defaults::object([("allowSignIn", Defaults::value(false))])
}

fn organization_defaults() -> Defaults {
    let rbac = Defaults::object([
        (
            "permissions",
            Defaults::record(Defaults::object([(
                "containedPermissionIds",
                Defaults::empty(),
            )])),
        ),
        (
            "defaultPermissions",
            Defaults::object([
                ("teamCreator", Defaults::empty()),
                ("teamMember", Defaults::empty()),
                ("signUp", Defaults::empty()),
            ]),
        ),
    ]);

    let api_keys = Defaults::object([(
        "enabled",
        Defaults::object([
            ("team", Defaults::value(false)),
            ("user", Defaults::value(false)),
        ]),
    )]);

    let teams = Defaults::object([
        ("createPersonalTeamOnSignUp", Defaults::value(false)),
        ("allowClientTeamCreation", Defaults::value(false)),
    ]);

    let users = Defaults::object([("allowClientUserDeletion", Defaults::value(false))]);

    let domains = Defaults::object([
        ("allowLocalhost", Defaults::value(false)),
        (
            "trustedDomains",
            Defaults::record(Defaults::object([("handlerPath", Defaults::value("/handler"))])),
        ),
    ]);

    let auth = Defaults::object([
        ("allowSignUp", Defaults::value(true)),
        ("password", sign_in_disabled()),
        ("otp", sign_in_disabled()),
        ("passkey", sign_in_disabled()),
        (
            "oauth",
            Defaults::object([
                ("accountMergeStrategy", Defaults::value("link_method")),
                (
                    "providers",
                    Defaults::record(Defaults::object([
                        ("isShared", Defaults::value(true)),
                        ("allowSignIn", Defaults::value(false)),
                        ("allowConnectedAccounts", Defaults::value(false)),
                    ])),
                ),
            ]),
        ),
    ]);

    let emails = Defaults::object([
        (
            "server",
            Defaults::object([("isShared", Defaults::value(true))]),
        ),
        ("selectedThemeId", Defaults::value(DEFAULT_EMAIL_THEME_ID)),
        (
            "themes",
            Defaults::record_with_known(
                Defaults::object([
                    ("displayName", Defaults::value(DEFAULT_THEME_NAME)),
                    ("tsxSource", Defaults::value(DEFAULT_THEME_SOURCE)),
                ]),
                built_in_email_themes(),
            ),
        ),
        (
            "templates",
            Defaults::record_with_known(
                Defaults::object([
                    ("displayName", Defaults::value(DEFAULT_TEMPLATE_NAME)),
                    ("tsxSource", Defaults::value(DEFAULT_TEMPLATE_SOURCE)),
                ]),
                built_in_email_templates(),
            ),
        ),
    ]);

    Defaults::object([
        ("rbac", rbac),
        ("apiKeys", api_keys),
        ("teams", teams),
        ("users", users),
        ("domains", domains),
        ("auth", auth),
        ("emails", emails),
    ])
}
