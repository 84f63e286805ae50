use super::*;
use std::fs;
use tempfile::TempDir;

fn write_json(dir: &TempDir, name: &str, value: Value) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, value.to_string()).expect("Failed to write test file");
    path
}

fn check(level: ConfigLevel, value: Value, allow_fixed: bool, warnings: bool) -> (bool, Value) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let file = write_json(&dir, "override.json", value);
    let args = CheckArgs {
        level,
        file,
        allow_fixed,
        warnings,
    };

    let result = execute(&args, &AppConfig::default()).expect("check should run");
    let report = serde_json::from_str(&result.output).expect("output should be JSON");
    (result.success, report)
}

#[test]
fn test_check_accepts_valid_override() {
    let (success, report) = check(
        ConfigLevel::Branch,
        json!({ "teams.allowClientTeamCreation": true, "auth": { "allowSignUp": null } }),
        false,
        false,
    );

    assert!(success);
    assert_eq!(report["valid"], json!(true));
    assert_eq!(report["level"], json!("branch"));
    assert_eq!(report["errors"], json!([]));
}

#[test]
fn test_check_reports_unknown_key() {
    let (success, report) = check(
        ConfigLevel::Branch,
        json!({ "teams.maxSize": 10 }),
        false,
        false,
    );

    assert!(!success);
    assert_eq!(report["valid"], json!(false));
    assert_eq!(report["errors"][0]["path"], json!("teams.maxSize"));
}

#[test]
fn test_check_fixed_key_needs_allow_fixed() {
    let value = json!({ "sourceOfTruth": { "type": "hosted" } });

    let (rejected, _) = check(ConfigLevel::Branch, value.clone(), false, false);
    assert!(!rejected);

    let (accepted, _) = check(ConfigLevel::Branch, value, true, false);
    assert!(accepted);
}

#[test]
fn test_check_reports_warnings_when_requested() {
    let value = json!({ "sourceOfTruth.type": "neon" });

    let (success, report) = check(ConfigLevel::Project, value.clone(), false, true);
    assert!(success);
    assert!(!report["warnings"].as_array().unwrap().is_empty());

    let (_, report) = check(ConfigLevel::Project, value, false, false);
    assert_eq!(report["warnings"], json!([]));
}

#[test]
fn test_check_fails_on_unreadable_file() {
    let args = CheckArgs {
        level: ConfigLevel::Project,
        file: PathBuf::from("does-not-exist.json"),
        allow_fixed: false,
        warnings: false,
    };

    assert!(execute(&args, &AppConfig::default()).is_err());
}
