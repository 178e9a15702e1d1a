//! Tests for configuration loading

use hub_domain::error::Error;
use hub_infrastructure::config::read_document;
use hub_infrastructure::{ConfigLoader, HubConfig};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

fn write(dir: &TempDir, file: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(file);
    fs::write(&path, contents).unwrap();
    path
}

/// Prefix no other test or developer shell sets
fn isolated(path: &Path, prefix: &str) -> ConfigLoader {
    ConfigLoader::new().with_config_path(path).with_env_prefix(prefix)
}

#[test]
fn test_toml_document_and_hub_section() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "hub.toml",
        r#"
[hub]
components = ["heartbeat"]
close_timeout = "2s"
exit_on_run_failure = true

[hub.logging]
level = "debug"

[heartbeat]
interval = "5s"
message = "still here"
"#,
    );

    let loaded = isolated(&path, "HUBTEST_TOML").load().unwrap();
    assert_eq!(loaded.source.as_deref(), Some(path.as_path()));
    assert_eq!(loaded.hub.components, vec!["heartbeat"]);
    assert_eq!(loaded.hub.close_timeout, Duration::from_secs(2));
    assert_eq!(
        loaded.hub.shutdown_grace_period,
        HubConfig::default().shutdown_grace_period
    );
    assert!(loaded.hub.exit_on_run_failure);
    assert_eq!(loaded.hub.logging.level, "debug");

    let heartbeat = loaded.raw.section("heartbeat");
    assert_eq!(heartbeat.get("interval"), Some(&json!("5s")));
    assert_eq!(heartbeat.get("message"), Some(&json!("still here")));
}

#[test]
fn test_yaml_and_json_documents() {
    let dir = TempDir::new().unwrap();
    let yaml = write(&dir, "hub.yaml", "clock: {}\nheartbeat:\n  interval: 1s\n");
    let json_path = write(&dir, "hub.json", r#"{"etcd": {"endpoints": "a:2379,b:2379"}}"#);

    let from_yaml = read_document(&yaml).unwrap();
    assert!(from_yaml.has_section("clock"));
    assert_eq!(from_yaml.section("heartbeat").get("interval"), Some(&json!("1s")));

    let from_json = read_document(&json_path).unwrap();
    assert_eq!(
        from_json.section("etcd").get("endpoints"),
        Some(&json!("a:2379,b:2379"))
    );
}

#[test]
fn test_defaults_without_hub_section() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "hub.toml", "[clock]\n");

    let loaded = isolated(&path, "HUBTEST_DEFAULTS").load().unwrap();
    assert_eq!(loaded.hub, HubConfig::default());
    assert_eq!(loaded.raw.keys().collect::<Vec<_>>(), vec!["clock"]);
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");

    let err = isolated(&missing, "HUBTEST_MISSING").load().unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "hub.ini", "[hub]\n");

    let err = read_document(&path).unwrap_err();
    assert!(err.to_string().contains("unsupported configuration format `.ini`"));
}

#[test]
fn test_malformed_document_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "hub.toml", "[hub\ncomponents = ");

    let err = isolated(&path, "HUBTEST_MALFORMED").load().unwrap_err();
    assert!(err.to_string().contains("failed to parse"));
}

#[test]
fn test_environment_overrides_hub_section() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "hub.toml",
        "[hub]\ncomponents = [\"clock\"]\nshutdown_grace_period = \"10s\"\n",
    );

    // SAFETY: the prefix is unique to this test
    unsafe {
        std::env::set_var("HUBTEST_ENV__COMPONENTS", "clock, heartbeat");
        std::env::set_var("HUBTEST_ENV__SHUTDOWN_GRACE_PERIOD", "250ms");
    }
    let loaded = isolated(&path, "HUBTEST_ENV").load();
    unsafe {
        std::env::remove_var("HUBTEST_ENV__COMPONENTS");
        std::env::remove_var("HUBTEST_ENV__SHUTDOWN_GRACE_PERIOD");
    }

    let loaded = loaded.unwrap();
    assert_eq!(loaded.hub.components, vec!["clock", "heartbeat"]);
    assert_eq!(loaded.hub.shutdown_grace_period, Duration::from_millis(250));
}

#[test]
fn test_invalid_hub_settings_are_rejected() {
    let dir = TempDir::new().unwrap();
    let bad_duration = write(&dir, "duration.toml", "[hub]\nclose_timeout = \"soon\"\n");
    let zero_timeout = write(&dir, "zero.toml", "[hub]\nclose_timeout = \"0s\"\n");
    let bad_level = write(&dir, "level.toml", "[hub.logging]\nlevel = \"loud\"\n");

    let err = isolated(&bad_duration, "HUBTEST_INVALID").load().unwrap_err();
    assert!(err.to_string().contains("invalid [hub] settings"));

    let err = isolated(&zero_timeout, "HUBTEST_INVALID").load().unwrap_err();
    assert!(err.to_string().contains("close_timeout cannot be 0"));

    assert!(isolated(&bad_level, "HUBTEST_INVALID").load().is_err());
}
