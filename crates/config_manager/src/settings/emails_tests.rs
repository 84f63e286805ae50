//! Tests for email settings

use super::*;

#[test]
fn test_branch_emails_reject_server() {
    let result: Result<BranchEmailSettings, _> = serde_json::from_value(serde_json::json!({
        "server": { "isShared": true }
    }));
    assert!(result.is_err());
}

#[test]
fn test_environment_emails_accept_server() {
    let emails: EnvironmentEmailSettings = serde_json::from_value(serde_json::json!({
        "selectedThemeId": "default-dark",
        "server": {
            "isShared": false,
            "host": "smtp.example.com",
            "port": 587,
            "senderEmail": "noreply@example.com"
        }
    }))
    .expect("Failed to deserialize");

    assert_eq!(emails.selected_theme_id.as_deref(), Some("default-dark"));
    let server = emails.server.unwrap();
    assert_eq!(server.port, Some(587));
    assert_eq!(server.host.as_deref(), Some("smtp.example.com"));
    assert!(server.username.is_none());
}

#[test]
fn test_port_out_of_range_is_rejected() {
    let result: Result<EmailServer, _> =
        serde_json::from_value(serde_json::json!({ "port": 70000 }));
    assert!(result.is_err());
}

#[test]
fn test_templates_keyed_by_id() {
    let emails: BranchEmailSettings = serde_json::from_value(serde_json::json!({
        "templates": {
            "welcome": { "displayName": "Welcome", "themeId": "default-light" }
        }
    }))
    .expect("Failed to deserialize");

    let welcome = &emails.templates.unwrap()["welcome"];
    assert_eq!(welcome.display_name.as_deref(), Some("Welcome"));
    assert!(welcome.tsx_source.is_none());
}
