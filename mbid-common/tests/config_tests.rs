//! Tests for configuration loading and graceful degradation
//!
//! Tests that manipulate MBID_* environment variables are marked with
//! #[serial] so they never run in parallel.

use mbid_common::config::{
    database_path, is_volatile_environment, load_toml_config, resolve_root_folder, StorageMedium,
    TomlConfig, DATABASE_FILE_NAME, ENV_DEV_MODE, ENV_ROOT_FOLDER,
};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
fn test_missing_config_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("does-not-exist.toml");

    let config = load_toml_config(Some(&path)).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_config_file_values_loaded() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
root_folder = "/srv/mbid"
dev_mode = true

[logging]
level = "debug"

[cache]
max_entries = 42

[musicbrainz]
rate_limit_ms = 1500
"#,
    )
    .unwrap();

    let config = load_toml_config(Some(&path)).unwrap();
    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/mbid")));
    assert_eq!(config.dev_mode, Some(true));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.cache.max_entries, 42);
    assert_eq!(config.musicbrainz.rate_limit_ms, 1500);
    assert_eq!(config.musicbrainz.base_url, "https://musicbrainz.org/ws/2");
}

#[test]
fn test_malformed_config_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "[cache\nmax_entries = ").unwrap();

    assert!(load_toml_config(Some(&path)).is_err());
}

#[test]
fn test_invalid_quota_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "[cache]\nmax_bytes = 0\n").unwrap();

    assert!(load_toml_config(Some(&path)).is_err());
}

#[test]
#[serial]
fn test_root_folder_priority() {
    env::remove_var(ENV_ROOT_FOLDER);
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    // CLI argument wins over everything
    let cli = PathBuf::from("/from/cli");
    assert_eq!(resolve_root_folder(Some(&cli), &config), cli);

    // Environment variable beats TOML
    env::set_var(ENV_ROOT_FOLDER, "/from/env");
    assert_eq!(resolve_root_folder(None, &config), PathBuf::from("/from/env"));
    env::remove_var(ENV_ROOT_FOLDER);

    // TOML beats the compiled default
    assert_eq!(resolve_root_folder(None, &config), PathBuf::from("/from/toml"));

    // Compiled default is never empty
    let fallback = resolve_root_folder(None, &TomlConfig::default());
    assert!(!fallback.as_os_str().is_empty());
}

#[test]
#[serial]
fn test_volatile_environment_detection() {
    env::remove_var(ENV_DEV_MODE);
    let config = TomlConfig::default();
    assert!(!is_volatile_environment(false, &config));
    assert!(is_volatile_environment(true, &config));

    env::set_var(ENV_DEV_MODE, "yes");
    assert!(is_volatile_environment(false, &config));

    // Explicit "off" in the environment overrides the TOML flag
    env::set_var(ENV_DEV_MODE, "off");
    let dev_config = TomlConfig {
        dev_mode: Some(true),
        ..Default::default()
    };
    assert!(!is_volatile_environment(false, &dev_config));

    env::remove_var(ENV_DEV_MODE);
    assert!(is_volatile_environment(false, &dev_config));
    assert_eq!(
        StorageMedium::for_environment(is_volatile_environment(false, &dev_config)),
        StorageMedium::Durable
    );
}

#[test]
fn test_database_path_inside_root() {
    let path = database_path(Path::new("/srv/mbid"));
    assert_eq!(path, Path::new("/srv/mbid").join(DATABASE_FILE_NAME));
}
