//! Unit tests for configuration and graceful degradation
//!
//! Tests that manipulate SAFRA_DATA_FOLDER are marked with #[serial]
//! so they run sequentially, not in parallel.

use safra_common::config::{DataFolderResolver, TomlConfig, DATA_FOLDER_ENV, DEFAULT_DATA_FOLDER};
use safra_common::Error;
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

fn write_toml(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write toml");
    file
}

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(DATA_FOLDER_ENV);

    let resolver = DataFolderResolver::new(None, None);
    assert_eq!(resolver.resolve(), PathBuf::from(DEFAULT_DATA_FOLDER));
}

#[test]
#[serial]
fn test_resolver_env_var_beats_toml() {
    env::set_var(DATA_FOLDER_ENV, "/tmp/safra-env-folder");

    let toml = TomlConfig {
        data_folder: Some(PathBuf::from("/tmp/safra-toml-folder")),
        ..TomlConfig::default()
    };
    let resolver = DataFolderResolver::new(None, Some(&toml));
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/safra-env-folder"));

    env::remove_var(DATA_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_toml_used_without_env() {
    env::remove_var(DATA_FOLDER_ENV);

    let toml = TomlConfig {
        data_folder: Some(PathBuf::from("/tmp/safra-toml-folder")),
        ..TomlConfig::default()
    };
    let resolver = DataFolderResolver::new(None, Some(&toml));
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/safra-toml-folder"));
}

#[test]
#[serial]
fn test_resolver_cli_beats_env() {
    env::set_var(DATA_FOLDER_ENV, "/tmp/safra-env-folder");

    let resolver = DataFolderResolver::new(Some(Path::new("/tmp/safra-cli")), None);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/safra-cli"));

    env::remove_var(DATA_FOLDER_ENV);
}

#[test]
fn test_full_toml_file() {
    let file = write_toml(
        r#"
data_folder = "/srv/safra/dados"
bind_addr = "0.0.0.0"
port = 8081
static_dir = "/srv/safra/static"

[logging]
level = "debug"
"#,
    );

    let config = TomlConfig::from_file(file.path()).expect("valid config");
    assert_eq!(config.data_folder, Some(PathBuf::from("/srv/safra/dados")));
    assert_eq!(config.bind_addr, "0.0.0.0");
    assert_eq!(config.port, 8081);
    assert_eq!(config.static_dir, Some(PathBuf::from("/srv/safra/static")));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_missing_file_is_not_found() {
    let result = TomlConfig::from_file(Path::new("/nonexistent/safra/config.toml"));
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[test]
fn test_invalid_log_level_rejected() {
    let file = write_toml("[logging]\nlevel = \"loud\"\n");
    let result = TomlConfig::from_file(file.path());
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_malformed_toml_rejected() {
    let file = write_toml("port = \"not a number\"\n");
    let result = TomlConfig::from_file(file.path());
    assert!(matches!(result, Err(Error::Toml(_))));
}

#[test]
fn test_load_or_default_degrades_gracefully() {
    let file = write_toml("port = [1, 2]\n");
    let config = TomlConfig::load_or_default(Some(file.path()));
    assert_eq!(config.port, 5000);

    let config = TomlConfig::load_or_default(Some(Path::new("/nonexistent/config.toml")));
    assert_eq!(config.bind_addr, "127.0.0.1");
}
