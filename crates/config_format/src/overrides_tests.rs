//! Tests for the override engine.

use super::*;
use crate::errors::FormatError;
use crate::value::ConfigValue;
use serde_json::{json, Value};

fn config(value: Value) -> Config {
    Config::try_from(value).expect("test config is valid")
}

// ============================================================================
// Pairwise override tests
// ============================================================================

/// Full shadow-clearing scenario including absent entries on both sides.
#[test]
fn test_override_shadow_clearing() {
    let base = config(json!({
        "a": 1,
        "b": 2,
        "c.d": 3,
        "c.e.f": 4,
        "c.g": 5,
        "h": [6, {"i": 7}, 8],
        "k": 123,
    }))
    .with_absent("l");
    let overlay = config(json!({
        "a": 9,
        "c.d": 10,
        "c.e": null,
        "h.0": 11,
        "h.1": {"j": 12},
    }))
    .with_absent("k");

    let result = override_config(&base, &overlay).expect("override succeeds");

    let expected = config(json!({
        "a": 9,
        "b": 2,
        "c.d": 10,
        "c.e": null,
        "c.g": 5,
        "h": [6, {"i": 7}, 8],
        "h.0": 11,
        "h.1": {"j": 12},
        "k": 123,
    }))
    .with_absent("l");
    assert_eq!(result, expected);
}

/// Overriding with an empty config is the identity.
#[test]
fn test_override_with_empty_is_identity() {
    let base = config(json!({"a": 1, "b.c": [1, 2]})).with_absent("d");

    assert_eq!(override_config(&base, &Config::new()).unwrap(), base);
}

/// Ancestors of an overlay key survive until normalization.
#[test]
fn test_override_keeps_ancestor_of_dotted_key() {
    let base = config(json!({"a": {"x": 1}}));
    let overlay = config(json!({"a.b": 2}));

    let result = override_config(&base, &overlay).unwrap();

    assert_eq!(Value::from(&result), json!({"a": {"x": 1}, "a.b": 2}));
}

/// A nested object literal replaces the base value wholesale.
#[test]
fn test_override_replaces_objects_without_deep_merge() {
    let base = config(json!({"a": {"x": 1, "y": 2}}));
    let overlay = config(json!({"a": {"y": 3}}));

    let result = override_config(&base, &overlay).unwrap();

    assert_eq!(Value::from(&result), json!({"a": {"y": 3}}));
}

/// A key sharing only a string prefix is not shadowed.
#[test]
fn test_override_does_not_clear_string_prefix_siblings() {
    let base = config(json!({"ab": 1, "a.b": 2}));
    let overlay = config(json!({"a": 3}));

    let result = override_config(&base, &overlay).unwrap();

    assert_eq!(Value::from(&result), json!({"ab": 1, "a": 3}));
}

#[test]
fn test_override_does_not_mutate_inputs() {
    let base = config(json!({"a": 1, "c.e.f": 4}));
    let overlay = config(json!({"c.e": null}));
    let (base_before, overlay_before) = (base.clone(), overlay.clone());

    let _ = override_config(&base, &overlay).unwrap();

    assert_eq!(base, base_before);
    assert_eq!(overlay, overlay_before);
}

#[test]
fn test_override_rejects_invalid_input() {
    let base = Config::new().with("bad key", 1_i64);

    let error = override_config(&base, &Config::new()).unwrap_err();

    assert!(matches!(error, FormatError::InvalidConfig { .. }));
}

// ============================================================================
// Multi-override tests
// ============================================================================

/// Overrides apply left to right.
#[test]
fn test_override_all_folds_left_to_right() {
    let base = config(json!({"a": 1}));
    let first = config(json!({"a": 2, "b.c": 3}));
    let second = config(json!({"b": null}));

    let result = override_all(&base, [&first, &second]).unwrap();

    assert_eq!(result.get("a"), Some(&ConfigValue::from(2_i64)));
    assert_eq!(result.get("b"), Some(&ConfigValue::Null));
    assert!(!result.contains_key("b.c"));
}

/// No overrides returns the base without validating it.
#[test]
fn test_override_all_with_no_overrides_skips_validation() {
    let base = Config::new().with("bad key", 1_i64);

    let result = override_all(&base, std::iter::empty::<&Config>()).unwrap();

    assert_eq!(result, base);
}
