//! Setting resolution tests (CLI → ENV → TOML)
//!
//! Tests touching PHYLOCOLOR_* variables run #[serial].

use phylocolor::config::{
    is_valid_value, resolve_api_key, resolve_reference_db, resolve_remote_config, API_KEY_ENV,
    REFERENCE_DB_ENV,
};
use phylocolor_common::config::{RemoteConfig, TomlConfig};
use phylocolor_common::Error;
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};

fn toml_with(reference_db: Option<&str>, api_key: Option<&str>) -> TomlConfig {
    TomlConfig {
        reference_db: reference_db.map(PathBuf::from),
        remote: RemoteConfig {
            api_key: api_key.map(str::to_string),
            min_delay_ms: 100,
            ..RemoteConfig::default()
        },
        ..TomlConfig::default()
    }
}

#[test]
#[serial]
fn test_reference_db_priority() {
    env::remove_var(REFERENCE_DB_ENV);
    let config = toml_with(Some("/toml/ref.db"), None);

    assert_eq!(
        resolve_reference_db(None, &config).unwrap(),
        PathBuf::from("/toml/ref.db")
    );

    env::set_var(REFERENCE_DB_ENV, "/env/ref.db");
    assert_eq!(
        resolve_reference_db(None, &config).unwrap(),
        PathBuf::from("/env/ref.db")
    );
    assert_eq!(
        resolve_reference_db(Some(Path::new("/cli/ref.db")), &config).unwrap(),
        PathBuf::from("/cli/ref.db")
    );

    env::remove_var(REFERENCE_DB_ENV);
}

#[test]
#[serial]
fn test_reference_db_unconfigured() {
    env::remove_var(REFERENCE_DB_ENV);
    let result = resolve_reference_db(None, &TomlConfig::default());
    match result {
        Err(Error::Config(msg)) => assert!(msg.contains(REFERENCE_DB_ENV)),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_blank_env_value_ignored() {
    env::set_var(REFERENCE_DB_ENV, "   ");
    let config = toml_with(Some("/toml/ref.db"), None);
    assert_eq!(
        resolve_reference_db(None, &config).unwrap(),
        PathBuf::from("/toml/ref.db")
    );
    env::remove_var(REFERENCE_DB_ENV);
}

#[test]
#[serial]
fn test_api_key_env_over_toml() {
    env::remove_var(API_KEY_ENV);
    let config = toml_with(None, Some("toml-key"));
    assert_eq!(resolve_api_key(&config).as_deref(), Some("toml-key"));

    env::set_var(API_KEY_ENV, "env-key");
    assert_eq!(resolve_api_key(&config).as_deref(), Some("env-key"));

    let remote = resolve_remote_config(&config);
    assert_eq!(remote.api_key.as_deref(), Some("env-key"));
    assert_eq!(remote.min_delay_ms, 100);

    env::remove_var(API_KEY_ENV);
}

#[test]
#[serial]
fn test_no_api_key_anywhere() {
    env::remove_var(API_KEY_ENV);
    assert!(resolve_api_key(&toml_with(None, Some(" "))).is_none());
}

#[test]
fn test_is_valid_value() {
    assert!(is_valid_value("abc"));
    assert!(!is_valid_value(""));
    assert!(!is_valid_value(" \t"));
}
