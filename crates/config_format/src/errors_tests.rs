//! Tests for format engine error types.

use super::*;

#[test]
fn test_dot_into_missing_message_names_key_and_segment() {
    let error = NormalizationError::DotIntoMissing {
        key: "b.c".to_string(),
        segment: "b".to_string(),
    };

    assert_eq!(
        error.to_string(),
        r#"Tried to use dot notation to access "b.c", but "b" doesn't exist on the object (or is null). Maybe this config is not normalizable?"#
    );
}

#[test]
fn test_dot_into_non_object_message_names_key_and_segment() {
    let error = NormalizationError::DotIntoNonObject {
        key: "b.c".to_string(),
        segment: "b".to_string(),
    };

    assert_eq!(
        error.to_string(),
        r#"Tried to use dot notation to access "b.c", but "b" is not an object. Maybe this config is not normalizable?"#
    );
}

#[test]
fn test_null_value_message() {
    assert_eq!(
        NormalizationError::NullValue.to_string(),
        "Tried to normalize a null value"
    );
}

#[test]
fn test_normalization_error_is_transparent_inside_format_error() {
    let error: FormatError = NormalizationError::NullValue.into();

    assert!(error.is_normalization());
    assert_eq!(error.to_string(), "Tried to normalize a null value");
}

#[test]
fn test_invalid_config_display_is_prefixed() {
    let error = FormatError::InvalidConfig {
        reason: "config must be a non-null object".to_string(),
    };

    assert!(!error.is_normalization());
    assert_eq!(
        error.to_string(),
        "Invalid config: config must be a non-null object"
    );
}
