use super::*;
use config_format::{DotIntoNonObject, DotIntoNull};
use tempfile::TempDir;

#[test]
fn test_app_config_default() {
    let config = AppConfig::default();

    assert!(config.normalize.is_none());
    assert!(config.output.pretty);
}

#[test]
fn test_app_config_parses_policies() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("tenant-config.toml");
    fs::write(
        &config_path,
        r#"
[normalize]
on_dot_into_non_object = "ignore"
on_dot_into_null = "empty-object"

[output]
pretty = false
"#,
    )
    .expect("Failed to write config");

    let config = AppConfig::load(&config_path).expect("Failed to load config");

    let normalize = config.normalize.expect("normalize section should be set");
    assert_eq!(normalize.on_dot_into_non_object, DotIntoNonObject::Ignore);
    assert_eq!(normalize.on_dot_into_null, DotIntoNull::EmptyObject);
    assert!(!config.output.pretty);
}

#[test]
fn test_app_config_partial_sections_use_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("tenant-config.toml");
    fs::write(&config_path, "[normalize]\non_dot_into_null = \"ignore\"\n")
        .expect("Failed to write config");

    let config = AppConfig::load(&config_path).expect("Failed to load config");

    let normalize = config.normalize.expect("normalize section should be set");
    assert_eq!(normalize.on_dot_into_non_object, DotIntoNonObject::Throw);
    assert_eq!(normalize.on_dot_into_null, DotIntoNull::Ignore);
    assert!(config.output.pretty);
}

#[test]
fn test_app_config_load_invalid_toml() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("invalid_config.toml");

    fs::write(&config_path, "invalid = toml = syntax").expect("Failed to write invalid TOML");

    let result = AppConfig::load(&config_path);

    if let Err(Error::Config(msg)) = result {
        assert!(msg.contains("Failed to parse configuration file"));
    } else {
        panic!("Expected Config error");
    }
}

#[test]
fn test_app_config_rejects_unknown_policy() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("tenant-config.toml");
    fs::write(&config_path, "[normalize]\non_dot_into_null = \"explode\"\n")
        .expect("Failed to write config");

    assert!(matches!(
        AppConfig::load(&config_path),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_app_config_load_nonexistent_file() {
    let nonexistent_path = PathBuf::from("nonexistent_config.toml");
    let result = AppConfig::load(&nonexistent_path);

    if let Err(Error::Config(msg)) = result {
        assert!(msg.contains("Configuration file not found"));
    } else {
        panic!("Expected Config error");
    }
}

#[test]
fn test_load_or_default_requires_explicit_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let missing = temp_dir.path().join("missing.toml");

    let result = AppConfig::load_or_default(missing.to_str());

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_app_config_save_and_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("tenant-config.toml");

    let original_config = AppConfig {
        normalize: Some(
            NormalizeOptions::new()
                .with_dot_into_non_object(DotIntoNonObject::Ignore)
                .with_dot_into_null(DotIntoNull::EmptyObject),
        ),
        output: OutputConfig { pretty: false },
    };

    original_config
        .save(&config_path)
        .expect("Failed to save config");
    assert!(config_path.exists());

    let loaded_config = AppConfig::load(&config_path).expect("Failed to load config");
    assert_eq!(loaded_config, original_config);
}

#[test]
fn test_get_config_path_with_explicit_path() {
    assert_eq!(
        get_config_path(Some("/etc/tenant.toml")),
        PathBuf::from("/etc/tenant.toml")
    );
}

#[test]
fn test_get_config_path_defaults_to_current_directory() {
    let path = get_config_path(None);
    assert!(path.ends_with(DEFAULT_CONFIG_FILENAME));
}
