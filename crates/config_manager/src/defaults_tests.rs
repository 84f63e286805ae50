//! Tests for default application.

use super::*;
use config_format::{normalize, DotIntoNonObject, NormalizeOptions};
use serde_json::json;

fn config(value: serde_json::Value) -> Config {
    Config::try_from(value).expect("test config should be valid")
}

fn leaf(value: i64) -> Defaults {
    Defaults::value(value)
}

// ============================================================================
// apply_defaults: plain objects
// ============================================================================

#[test]
fn test_config_value_wins_over_default() {
    let defaults = Defaults::object([("a", leaf(1))]);
    assert_eq!(apply_defaults(&defaults, &config(json!({ "a": 2 }))), config(json!({ "a": 2 })));
}

#[test]
fn test_empty_defaults_keep_config() {
    assert_eq!(
        apply_defaults(&Defaults::empty(), &config(json!({ "a": 1 }))),
        config(json!({ "a": 1 }))
    );
}

#[test]
fn test_nested_objects_are_merged() {
    let defaults = Defaults::object([("a", Defaults::object([("b", leaf(1))]))]);

    assert_eq!(
        apply_defaults(&defaults, &config(json!({ "a": { "b": 2 } }))),
        config(json!({ "a": { "b": 2 } }))
    );
    assert_eq!(
        apply_defaults(&defaults, &config(json!({ "a": { "c": 2 } }))),
        config(json!({ "a": { "b": 1, "c": 2 } }))
    );
}

#[test]
fn test_deep_merge() {
    let defaults = Defaults::object([(
        "a",
        Defaults::object([("b", Defaults::object([("c", leaf(1)), ("d", leaf(2))]))]),
    )]);

    assert_eq!(
        apply_defaults(&defaults, &config(json!({ "a": { "b": { "d": 3, "e": 4 } } }))),
        config(json!({ "a": { "b": { "c": 1, "d": 3, "e": 4 } } }))
    );
}

/// Verify an explicit null replaces the default instead of merging.
#[test]
fn test_null_replaces_default() {
    let defaults = Defaults::object([("a", Defaults::object([("b", leaf(1))]))]);

    assert_eq!(
        apply_defaults(&defaults, &config(json!({ "a": null }))),
        config(json!({ "a": null }))
    );
}

// ============================================================================
// apply_defaults: records
// ============================================================================

#[test]
fn test_record_template_applies_to_every_key() {
    let defaults = Defaults::object([("a", Defaults::record(Defaults::object([("b", leaf(1))])))]);

    assert_eq!(
        apply_defaults(&defaults, &config(json!({ "a": { "c": { "d": 1 } } }))),
        config(json!({ "a": { "c": { "b": 1, "d": 1 } } }))
    );
    assert_eq!(apply_defaults(&defaults, &Config::new()), config(json!({ "a": {} })));
}

#[test]
fn test_record_known_entries_always_exist() {
    let known = NormalizedConfig::try_from(json!({ "a": { "b": 1, "c": 2 } })).unwrap();
    let defaults = Defaults::record_with_known(Defaults::object([("b", leaf(1))]), known);

    assert_eq!(
        apply_defaults(&defaults, &config(json!({ "a": {} }))),
        config(json!({ "a": { "b": 1, "c": 2 } }))
    );
    assert_eq!(
        apply_defaults(&defaults, &config(json!({ "d": {} }))),
        config(json!({ "a": { "b": 1, "c": 2 }, "d": { "b": 1 } }))
    );
}

// ============================================================================
// apply_defaults: dot notation
// ============================================================================

#[test]
fn test_dotted_key_without_default_is_kept_literally() {
    let defaults = Defaults::object([("a", Defaults::object([("b", leaf(1))]))]);

    assert_eq!(
        apply_defaults(&defaults, &config(json!({ "a.c": 2 }))),
        config(json!({ "a": { "b": 1 }, "a.c": 2 }))
    );
}

#[test]
fn test_dotted_key_through_leaf_default() {
    let defaults = Defaults::object([("a", leaf(1))]);
    assert_eq!(
        apply_defaults(&defaults, &config(json!({ "a.b": 2 }))),
        config(json!({ "a": 1, "a.b": 2 }))
    );

    let defaults = Defaults::object([("a", Defaults::value(ConfigValue::Null))]);
    assert_eq!(
        apply_defaults(&defaults, &config(json!({ "a.b": 2 }))),
        config(json!({ "a": null, "a.b": 2 }))
    );
}

#[test]
fn test_dotted_object_value_is_merged_with_defaults() {
    let defaults = Defaults::object([(
        "a",
        Defaults::object([("b", Defaults::object([("c", leaf(1))]))]),
    )]);

    assert_eq!(
        apply_defaults(&defaults, &config(json!({ "a.b": { "d": 2 } }))),
        config(json!({ "a": { "b": { "c": 1 } }, "a.b": { "c": 1, "d": 2 } }))
    );
}

#[test]
fn test_dotted_key_materializes_record_entries() {
    let defaults = Defaults::object([("a", Defaults::record(Defaults::object([("c", leaf(1))])))]);
    assert_eq!(
        apply_defaults(&defaults, &config(json!({ "a.b": { "d": 2 } }))),
        config(json!({ "a": { "b": { "c": 1 } }, "a.b": { "c": 1, "d": 2 } }))
    );

    let defaults = Defaults::object([(
        "a",
        Defaults::object([(
            "b",
            Defaults::record(Defaults::object([("c", leaf(1)), ("d", leaf(2))])),
        )]),
    )]);
    assert_eq!(
        apply_defaults(&defaults, &config(json!({ "a.b.x-y.c": 3 }))),
        config(json!({ "a": { "b": { "x-y": { "c": 1, "d": 2 } } }, "a.b.x-y.c": 3 }))
    );
}

#[test]
fn test_apply_defaults_does_not_mutate_config() {
    let defaults = Defaults::object([("a", Defaults::object([("b", leaf(1))]))]);
    let input = config(json!({ "a": { "c": 2 }, "a.d": 3 }));
    let before = input.clone();

    let _ = apply_defaults(&defaults, &input);

    assert_eq!(input, before);
}

// ============================================================================
// Level defaults
// ============================================================================

fn normalized(config: &Config) -> NormalizedConfig {
    let options = NormalizeOptions::new().with_dot_into_non_object(DotIntoNonObject::Ignore);
    normalize(config, options).expect("defaults should normalize")
}

#[test]
fn test_project_defaults_to_hosted() {
    let applied = apply_level_defaults(ConfigLevel::Project, &Config::new());
    assert_eq!(applied, config(json!({ "sourceOfTruth": { "type": "hosted" } })));
}

#[test]
fn test_branch_and_environment_add_nothing_of_their_own() {
    assert_eq!(level_defaults(ConfigLevel::Branch), Defaults::empty());
    assert_eq!(
        apply_level_defaults(ConfigLevel::Environment, &Config::new()),
        apply_level_defaults(ConfigLevel::Project, &Config::new())
    );
}

#[test]
fn test_organization_defaults() {
    let applied = apply_level_defaults(
        ConfigLevel::Organization,
        &config(json!({ "auth.oauth.providers.google.type": "google" })),
    );
    let result = normalized(&applied);

    assert_eq!(
        result.get_path(&["sourceOfTruth", "type"]).and_then(NormalizedValue::as_str),
        Some("hosted")
    );
    assert_eq!(
        result.get_path(&["auth", "allowSignUp"]).and_then(NormalizedValue::as_bool),
        Some(true)
    );
    assert_eq!(
        result
            .get_path(&["auth", "oauth", "accountMergeStrategy"])
            .and_then(NormalizedValue::as_str),
        Some("link_method")
    );

    let google = result
        .get_path(&["auth", "oauth", "providers", "google"])
        .and_then(NormalizedValue::as_object)
        .expect("provider should exist");
    assert_eq!(google.get("type").and_then(NormalizedValue::as_str), Some("google"));
    assert_eq!(google.get("isShared").and_then(NormalizedValue::as_bool), Some(true));
    assert_eq!(google.get("allowSignIn").and_then(NormalizedValue::as_bool), Some(false));

    assert_eq!(
        result.get_path(&["emails", "selectedThemeId"]).and_then(NormalizedValue::as_str),
        Some(DEFAULT_EMAIL_THEME_ID)
    );
    assert!(result
        .get_path(&["emails", "themes", DEFAULT_EMAIL_THEME_ID])
        .is_some());
    assert!(result
        .get_path(&["emails", "templates", "password-reset"])
        .is_some());
}

#[test]
fn test_organization_record_templates() {
    let applied = apply_level_defaults(
        ConfigLevel::Organization,
        &config(json!({
            "domains.trustedDomains.prod.baseUrl": "https://example.com",
            "emails.themes.custom": {}
        })),
    );
    let result = normalized(&applied);

    assert_eq!(
        result
            .get_path(&["domains", "trustedDomains", "prod", "handlerPath"])
            .and_then(NormalizedValue::as_str),
        Some("/handler")
    );
    assert_eq!(
        result
            .get_path(&["emails", "themes", "custom", "displayName"])
            .and_then(NormalizedValue::as_str),
        Some("Unnamed Theme")
    );
}

/// Verify a null set by the config deletes the defaulted section.
#[test]
fn test_null_deletes_defaulted_section() {
    let applied = apply_level_defaults(ConfigLevel::Organization, &config(json!({ "teams": null })));
    let result = normalized(&applied);

    assert!(result.get("teams").is_none());
    assert!(result.get("users").is_some());
}
