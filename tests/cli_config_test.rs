//! Integration tests for the config commands.
//!
//! Covers the persisted store (set/get/show/clear/path), file permission
//! handling, corruption degrade, and the cli > env > file precedence as
//! seen through the real binary.

mod common;

use common::{TestEnv, parse_json};
use predicates::prelude::*;
use std::fs;

// ============================================================================
// config path / config set
// ============================================================================

#[test]
fn test_config_path_points_into_config_dir() {
    let env = TestEnv::new();

    env.n8ncli()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".n8ncli.json"))
        .stdout(predicate::str::contains(
            env.config_path().to_str().unwrap(),
        ));
}

#[test]
fn test_config_set_host_creates_file() {
    let env = TestEnv::new();

    env.n8ncli()
        .args(["config", "set", "host", "https://n8n.example.com/api/v1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Set host to https://n8n.example.com/api/v1",
        ));

    let content = fs::read_to_string(env.config_file()).unwrap();
    assert!(content.ends_with("\n"));
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["host"], "https://n8n.example.com/api/v1");
}

#[cfg(unix)]
#[test]
fn test_config_file_created_with_0600_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let env = TestEnv::new();

    env.n8ncli()
        .args(["config", "set", "apikey", "n8n_api_1234567890abcdef"])
        .assert()
        .success();

    let mode = fs::metadata(env.config_file()).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}

#[test]
fn test_config_set_apikey_prints_masked_value() {
    let env = TestEnv::new();

    env.n8ncli()
        .args(["config", "set", "apikey", "abcdefghijklmnopqrstuvwxyz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abcdefgh...wxyz"))
        .stdout(predicate::str::contains("abcdefghijklmnopqrstuvwxyz").not());
}

#[test]
fn test_config_set_accepts_key_aliases() {
    let env = TestEnv::new();

    env.n8ncli()
        .args(["config", "set", "N8NHOST", "https://n8n.example.com"])
        .assert()
        .success();

    env.n8ncli()
        .args(["config", "set", "n8nkey", "some-api-key-value"])
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(env.config_file()).unwrap()).unwrap();
    assert_eq!(value["host"], "https://n8n.example.com");
    assert_eq!(value["apiKey"], "some-api-key-value");
}

#[test]
fn test_config_set_rejects_invalid_host_without_writing() {
    let env = TestEnv::new();

    env.n8ncli()
        .args(["config", "set", "host", "not-a-url"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid URL format"));

    assert!(!env.config_file().exists());
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let env = TestEnv::new();

    env.n8ncli()
        .args(["config", "set", "bogus", "value"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Unknown config key: bogus"))
        .stderr(predicate::str::contains("host, apikey"));
}

#[test]
fn test_config_set_preserves_other_field() {
    let env = TestEnv::new();

    env.n8ncli()
        .args(["config", "set", "host", "https://n8n.example.com/api/v1"])
        .assert()
        .success();
    env.n8ncli()
        .args(["config", "set", "apikey", "the-key-value-here"])
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(env.config_file()).unwrap()).unwrap();
    assert_eq!(value["host"], "https://n8n.example.com/api/v1");
    assert_eq!(value["apiKey"], "the-key-value-here");
}

// ============================================================================
// config show / config get
// ============================================================================

#[test]
fn test_config_show_empty_reports_missing() {
    let env = TestEnv::new();

    env.n8ncli()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(not set)"))
        .stdout(predicate::str::contains("missing"));
}

#[test]
fn test_config_show_reports_file_source() {
    let env = TestEnv::new();

    env.n8ncli()
        .args(["config", "set", "host", "https://n8n.example.com/api/v1"])
        .assert()
        .success();

    let output = env
        .n8ncli()
        .args(["config", "show", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value = parse_json(&output);
    assert_eq!(value["host"], "https://n8n.example.com/api/v1");
    assert_eq!(value["hostSource"], "file");
    assert_eq!(value["apiKey"], "(not set)");
    assert_eq!(value["apiKeySource"], "missing");
}

#[test]
fn test_config_show_masks_api_key() {
    let env = TestEnv::new();

    env.n8ncli()
        .args(["config", "set", "apikey", "abcdefghijklmnopqrstuvwxyz"])
        .assert()
        .success();

    env.n8ncli()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abcdefgh...wxyz"))
        .stdout(predicate::str::contains("abcdefghijklmnopqrstuvwxyz").not());
}

#[test]
fn test_config_show_works_without_subcommand() {
    let env = TestEnv::new();

    env.n8ncli()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Current Configuration"));
}

#[test]
fn test_config_get_host() {
    let env = TestEnv::new();

    env.n8ncli()
        .args(["config", "set", "host", "https://n8n.example.com/api/v1"])
        .assert()
        .success();

    env.n8ncli()
        .args(["config", "get", "host"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://n8n.example.com/api/v1"))
        .stdout(predicate::str::contains("(from file)"));
}

#[test]
fn test_config_get_unset_key() {
    let env = TestEnv::new();

    env.n8ncli()
        .args(["config", "get", "apikey"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apiKey is not set"));
}

// ============================================================================
// Precedence: cli > env > file
// ============================================================================

#[test]
fn test_env_var_overrides_file() {
    let env = TestEnv::new();

    env.n8ncli()
        .args(["config", "set", "host", "https://file.example"])
        .assert()
        .success();

    let output = env
        .n8ncli()
        .env("N8N_HOST", "https://env.example")
        .args(["config", "show", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value = parse_json(&output);
    assert_eq!(value["host"], "https://env.example");
    assert_eq!(value["hostSource"], "env");
}

#[test]
fn test_cli_flag_overrides_env_and_file() {
    let env = TestEnv::new();

    env.n8ncli()
        .args(["config", "set", "host", "https://file.example"])
        .assert()
        .success();

    let output = env
        .n8ncli()
        .env("N8N_HOST", "https://env.example")
        .args([
            "--host",
            "https://cli.example",
            "config",
            "show",
            "--json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value = parse_json(&output);
    assert_eq!(value["host"], "https://cli.example");
    assert_eq!(value["hostSource"], "cli");
}

#[test]
fn test_empty_cli_flag_falls_through_to_env() {
    let env = TestEnv::new();

    let output = env
        .n8ncli()
        .env("N8N_HOST", "https://env.example")
        .args(["--host", "", "config", "show", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value = parse_json(&output);
    assert_eq!(value["host"], "https://env.example");
    assert_eq!(value["hostSource"], "env");
}

#[test]
fn test_fields_resolve_from_different_sources() {
    let env = TestEnv::new();

    env.n8ncli()
        .args(["config", "set", "apikey", "file-api-key-value"])
        .assert()
        .success();

    let output = env
        .n8ncli()
        .env("N8N_HOST", "https://env.example")
        .args(["config", "show", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value = parse_json(&output);
    assert_eq!(value["hostSource"], "env");
    assert_eq!(value["apiKeySource"], "file");
}

// ============================================================================
// Degraded states: corrupt file, loose permissions
// ============================================================================

#[test]
fn test_corrupt_config_file_warns_and_degrades() {
    let env = TestEnv::new();
    fs::write(env.config_file(), "{this is not json").unwrap();

    env.n8ncli()
        .args(["config", "show"])
        .assert()
        .success()
        .stderr(predicate::str::contains("invalid JSON"))
        .stdout(predicate::str::contains("(not set)"));
}

#[test]
fn test_corrupt_config_file_is_repairable_with_set() {
    let env = TestEnv::new();
    fs::write(env.config_file(), "garbage").unwrap();

    env.n8ncli()
        .args(["config", "set", "host", "https://n8n.example.com"])
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(env.config_file()).unwrap()).unwrap();
    assert_eq!(value["host"], "https://n8n.example.com");
}

#[test]
fn test_non_string_field_treated_as_absent() {
    let env = TestEnv::new();
    fs::write(
        env.config_file(),
        r#"{"host": 12345, "apiKey": "real-key-from-file"}"#,
    )
    .unwrap();

    let output = env
        .n8ncli()
        .args(["config", "show", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value = parse_json(&output);
    assert_eq!(value["host"], "(not set)");
    assert_eq!(value["hostSource"], "missing");
    assert_eq!(value["apiKeySource"], "file");
}

#[cfg(unix)]
#[test]
fn test_loose_permissions_warn_but_do_not_block() {
    use std::os::unix::fs::PermissionsExt;

    let env = TestEnv::new();
    fs::write(
        env.config_file(),
        r#"{"host": "https://n8n.example.com/api/v1"}"#,
    )
    .unwrap();
    fs::set_permissions(env.config_file(), fs::Permissions::from_mode(0o644)).unwrap();

    env.n8ncli()
        .args(["config", "show"])
        .assert()
        .success()
        .stderr(predicate::str::contains("too open"))
        .stderr(predicate::str::contains("644"))
        .stderr(predicate::str::contains("chmod 600"))
        .stdout(predicate::str::contains("https://n8n.example.com/api/v1"));
}

#[cfg(unix)]
#[test]
fn test_tight_permissions_do_not_warn() {
    use std::os::unix::fs::PermissionsExt;

    let env = TestEnv::new();
    fs::write(
        env.config_file(),
        r#"{"host": "https://n8n.example.com/api/v1"}"#,
    )
    .unwrap();
    fs::set_permissions(env.config_file(), fs::Permissions::from_mode(0o600)).unwrap();

    env.n8ncli()
        .args(["config", "show"])
        .assert()
        .success()
        .stderr(predicate::str::contains("too open").not());
}

// ============================================================================
// config clear
// ============================================================================

#[test]
fn test_config_clear_removes_file() {
    let env = TestEnv::new();

    env.n8ncli()
        .args(["config", "set", "host", "https://n8n.example.com"])
        .assert()
        .success();

    env.n8ncli()
        .args(["config", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));

    assert!(!env.config_file().exists());
}

#[test]
fn test_config_clear_with_nothing_to_clear() {
    let env = TestEnv::new();

    env.n8ncli()
        .args(["config", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No configuration file to remove"));
}
