//! Final clean-up of a resolved config.
//!
//! Sanitizing runs after defaults are applied and the config is normalized.
//! It repairs values that are schema-valid in isolation but inconsistent as a
//! whole, so consumers can rely on the shapes below without further checks.

use crate::{
    defaults::{built_in_email_templates, built_in_email_themes, DEFAULT_EMAIL_THEME_ID},
    hierarchy::ConfigLevel,
};
use config_format::{NormalizedConfig, NormalizedValue};
use tracing::debug;

#[cfg(test)]
#[path = "sanitize_tests.rs"]
mod tests;

/// Sanitizes a resolved config for `level`.
///
/// Every level collapses `sourceOfTruth` to one well-formed variant. The
/// organization level additionally guarantees the built-in email themes and
/// templates exist and that `emails.selectedThemeId` names a known theme.
pub fn sanitize_config(level: ConfigLevel, config: NormalizedConfig) -> NormalizedConfig {
    let mut sanitized = config;
    let source_of_truth = sanitize_source_of_truth(sanitized.get("sourceOfTruth"));
    sanitized.insert("sourceOfTruth", source_of_truth);

    if level == ConfigLevel::Organization {
        sanitize_emails(&mut sanitized);
    }

    debug!("Sanitized {} config", level);
    sanitized
}

fn sanitize_source_of_truth(current: Option<&NormalizedValue>) -> NormalizedConfig {
    let current = current.and_then(NormalizedValue::as_object);
    let kind = current
        .and_then(|c| c.get("type"))
        .and_then(NormalizedValue::as_str);

    match (kind, current) {
        (Some("neon"), Some(current)) => {
            if let Some(strings) = current
                .get("connectionStrings")
                .and_then(NormalizedValue::as_object)
            {
                let connection_strings: NormalizedConfig = strings
                    .iter()
                    .filter(|(_, value)| value.as_str().is_some())
                    .map(|(name, value)| (name.to_string(), value.clone()))
                    .collect();
                return NormalizedConfig::new()
                    .with("type", "neon")
                    .with("connectionStrings", connection_strings);
            }
        }
        (Some("postgres"), Some(current)) => {
            if let Some(connection_string) = current
                .get("connectionString")
                .and_then(NormalizedValue::as_str)
            {
                return NormalizedConfig::new()
                    .with("type", "postgres")
                    .with("connectionString", connection_string);
            }
        }
        _ => {}
    }

    NormalizedConfig::new().with("type", "hosted")
}

fn sanitize_emails(config: &mut NormalizedConfig) {
    let mut emails = config
        .remove("emails")
        .and_then(|value| match value {
            NormalizedValue::Object(emails) => Some(emails),
            _ => None,
        })
        .unwrap_or_default();

    let themes = with_built_ins(built_in_email_themes(), emails.remove("themes"));
    let templates = with_built_ins(built_in_email_templates(), emails.remove("templates"));

    let selected_is_known = emails
        .get("selectedThemeId")
        .and_then(NormalizedValue::as_str)
        .is_some_and(|id| themes.contains_key(id));
    if !selected_is_known {
        emails.insert("selectedThemeId", DEFAULT_EMAIL_THEME_ID);
    }

    emails.insert("themes", themes);
    emails.insert("templates", templates);
    config.insert("emails", emails);
}

/// Entries of `configured` take precedence over the built-ins with the same id.
fn with_built_ins(
    built_ins: NormalizedConfig,
    configured: Option<NormalizedValue>,
) -> NormalizedConfig {
    let mut merged = built_ins;
    if let Some(NormalizedValue::Object(configured)) = configured {
        for (id, entry) in configured {
            merged.insert(id, entry);
        }
    }
    merged
}
