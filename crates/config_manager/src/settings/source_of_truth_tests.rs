//! Tests for SourceOfTruth

use super::*;

#[test]
fn test_default_is_hosted() {
    assert_eq!(SourceOfTruth::default(), SourceOfTruth::Hosted);
    assert_eq!(SourceOfTruth::default().type_name(), "hosted");
}

#[test]
fn test_neon_uses_camel_case_field() {
    let source: SourceOfTruth = serde_json::from_value(serde_json::json!({
        "type": "neon",
        "connectionStrings": { "main": "postgres://neon/main" }
    }))
    .expect("Failed to deserialize");

    match source {
        SourceOfTruth::Neon { connection_strings } => {
            assert_eq!(connection_strings["main"], "postgres://neon/main");
        }
        other => panic!("Expected Neon, got {:?}", other),
    }
}

#[test]
fn test_serialize_writes_type_tag() {
    let source = SourceOfTruth::Postgres {
        connection_string: "postgres://db".to_string(),
    };

    let json = serde_json::to_value(&source).expect("Failed to serialize");
    assert_eq!(
        json,
        serde_json::json!({ "type": "postgres", "connectionString": "postgres://db" })
    );
}

#[test]
fn test_unknown_type_is_rejected() {
    let result: Result<SourceOfTruth, _> =
        serde_json::from_value(serde_json::json!({ "type": "sqlite" }));
    assert!(result.is_err());
}
