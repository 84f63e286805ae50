use super::*;
use clap::CommandFactory;
use config_manager::ConfigLevel;

#[test]
fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_check_command() {
    let cli = Cli::try_parse_from([
        "tenant-config",
        "check",
        "--level",
        "branch",
        "--allow-fixed",
        "override.json",
    ])
    .expect("check should parse");

    match cli.command {
        Commands::Check(args) => {
            assert_eq!(args.level, ConfigLevel::Branch);
            assert!(args.allow_fixed);
            assert!(!args.warnings);
        }
        other => panic!("Expected Check command, got {:?}", other),
    }
}

#[test]
fn test_parse_rejects_unknown_level() {
    let result = Cli::try_parse_from(["tenant-config", "schema", "--level", "galaxy"]);
    assert!(result.is_err());
}

#[test]
fn test_parse_resolve_defaults_to_organization() {
    let cli = Cli::try_parse_from(["tenant-config", "resolve", "--branch", "branch.json"])
        .expect("resolve should parse");

    match cli.command {
        Commands::Resolve(args) => {
            assert_eq!(args.level, ConfigLevel::Organization);
            assert!(args.branch.is_some());
            assert!(args.project.is_none());
        }
        other => panic!("Expected Resolve command, got {:?}", other),
    }
}

#[test]
fn test_parse_normalize_policy_flags() {
    let cli = Cli::try_parse_from([
        "tenant-config",
        "normalize",
        "--on-dot-into-null",
        "empty-object",
        "config.json",
    ])
    .expect("normalize should parse");

    match cli.command {
        Commands::Normalize(args) => {
            assert_eq!(
                args.on_dot_into_null,
                Some(config_cli::commands::NullPolicy::EmptyObject)
            );
            assert!(args.on_dot_into_non_object.is_none());
        }
        other => panic!("Expected Normalize command, got {:?}", other),
    }
}

#[test]
fn test_parse_override_requires_an_overlay() {
    assert!(Cli::try_parse_from(["tenant-config", "override", "base.json"]).is_err());
}

#[test]
fn test_global_config_flag() {
    let cli = Cli::try_parse_from(["tenant-config", "version", "--config", "custom.toml"])
        .expect("version should parse");

    assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    assert!(matches!(cli.command, Commands::Version));
}
