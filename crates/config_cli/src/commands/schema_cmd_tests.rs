use super::*;
use serde_json::Value;

fn schema(level: ConfigLevel, override_schema: bool) -> Value {
    let args = SchemaArgs {
        level,
        override_schema,
    };
    let result = execute(&args, &AppConfig::default()).expect("schema should succeed");
    assert!(result.success);
    serde_json::from_str(&result.output).expect("output should be JSON")
}

#[test]
fn test_schema_prints_level_properties() {
    let project = schema(ConfigLevel::Project, false);
    assert!(project["properties"].get("sourceOfTruth").is_some());
    assert!(project["properties"].get("auth").is_none());

    let branch = schema(ConfigLevel::Branch, false);
    assert!(branch["properties"].get("auth").is_some());
}

#[test]
fn test_override_schema_differs_from_full_schema() {
    let full = schema(ConfigLevel::Environment, false);
    let overrides = schema(ConfigLevel::Environment, true);

    assert_ne!(full, overrides);
}
