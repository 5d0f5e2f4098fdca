// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Volly configuration system.

use std::fs;

use volly_config::{load_and_validate_str, load_config_from_path, load_config_from_str, ConfigError};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_volly_config() {
    let toml = r#"
[agent]
name = "test-agent"
log_level = "debug"
country = "Israel"
default_language = "Hebrew"
history_window = 6

[anthropic]
api_key = "sk-ant-123"
default_model = "claude-sonnet-4-20250514"
max_tokens = 512

[storage]
database_path = "/tmp/test.db"
wal_mode = false

[whatsapp]
access_token = "EAAG-test"
phone_number_id = "1055512345"
verify_token = "shared-secret"

[gateway]
host = "0.0.0.0"
port = 9090

[broadcast]
parallelism = 8
deadline_secs = 60
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "test-agent");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.agent.country, "Israel");
    assert_eq!(config.agent.default_language, "Hebrew");
    assert_eq!(config.agent.history_window, 6);
    assert_eq!(config.anthropic.api_key.as_deref(), Some("sk-ant-123"));
    assert_eq!(config.anthropic.max_tokens, 512);
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.whatsapp.access_token.as_deref(), Some("EAAG-test"));
    assert_eq!(config.whatsapp.phone_number_id.as_deref(), Some("1055512345"));
    assert_eq!(config.whatsapp.verify_token.as_deref(), Some("shared-secret"));
    assert_eq!(config.gateway.host, "0.0.0.0");
    assert_eq!(config.gateway.port, 9090);
    assert_eq!(config.broadcast.parallelism, 8);
    assert_eq!(config.broadcast.deadline_secs, 60);
}

/// Unknown field in [agent] section is rejected.
#[test]
fn unknown_field_in_agent_produces_error() {
    let toml = r#"
[agent]
naem = "test"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    // Figment wraps serde's deny_unknown_fields error
    assert!(
        err_str.contains("unknown field") || err_str.contains("naem"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown field in [whatsapp] section is rejected.
#[test]
fn unknown_field_in_whatsapp_produces_error() {
    let toml = r#"
[whatsapp]
acess_token = "abc"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("acess_token"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let toml = "";
    let config = load_config_from_str(toml).expect("empty TOML should use defaults");

    assert_eq!(config.agent.name, "volly");
    assert_eq!(config.agent.log_level, "info");
    assert_eq!(config.agent.country, "Israel");
    assert_eq!(config.agent.default_language, "English");
    assert_eq!(config.agent.history_window, 10);
    assert!(config.anthropic.api_key.is_none());
    assert_eq!(config.anthropic.default_model, "claude-sonnet-4-20250514");
    assert!(config.whatsapp.access_token.is_none());
    assert!(config.whatsapp.verify_token.is_none());
    assert_eq!(config.whatsapp.api_base, "https://graph.facebook.com/v19.0");
    assert_eq!(config.gateway.host, "127.0.0.1");
    assert_eq!(config.gateway.port, 8080);
    assert_eq!(config.broadcast.parallelism, 4);
    assert_eq!(config.broadcast.deadline_secs, 300);
    assert!(config.storage.wal_mode);
}

/// Loading from an explicit file path merges over defaults.
#[test]
fn load_from_path_merges_file_over_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("volly.toml");
    fs::write(
        &path,
        r#"
[gateway]
port = 9000

[storage]
database_path = "/tmp/volly-path-test.db"
"#,
    )
    .unwrap();

    let config = load_config_from_path(&path).expect("file should load");
    assert_eq!(config.gateway.port, 9000);
    assert_eq!(config.storage.database_path, "/tmp/volly-path-test.db");
    assert_eq!(config.gateway.host, "127.0.0.1");
}

/// Validation errors surface through load_and_validate_str.
#[test]
fn invalid_values_fail_validation() {
    let toml = r#"
[agent]
history_window = 0

[broadcast]
parallelism = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| matches!(e, ConfigError::Validation { .. })));
}

/// Parse errors are reported as a single Parse diagnostic.
#[test]
fn malformed_toml_reports_parse_error() {
    let toml = "[agent\nname = ";
    let errors = load_and_validate_str(toml).expect_err("should fail to parse");
    assert!(matches!(errors[0], ConfigError::Parse(_)));
}
