//! Configuration loading and data folder resolution
//!
//! Bootstrap settings come from an optional TOML file. Every setting has a
//! built-in default, so a missing file never prevents startup.
//!
//! # Data folder priority
//!
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`SAFRA_DATA_FOLDER`)
//! 3. TOML config file (`data_folder`)
//! 4. Compiled default (`./dados`)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the data folder
pub const DATA_FOLDER_ENV: &str = "SAFRA_DATA_FOLDER";

/// Compiled default data folder, relative to the working directory
pub const DEFAULT_DATA_FOLDER: &str = "dados";

/// Sub-folder holding the pre-computed feather tables
pub const PROCESSED_SUBDIR: &str = "processados";

/// Sub-folder and file name of the state boundary document
pub const GEOJSON_SUBDIR: &str = "geojson";
pub const GEOJSON_FILE: &str = "BrazilGeoJSON.geojson";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Root data folder (contains `processados/` and `geojson/`)
    #[serde(default)]
    pub data_folder: Option<PathBuf>,

    /// Interface the HTTP server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Folder with the dashboard HTML/JS assets (optional)
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            data_folder: None,
            bind_addr: default_bind_addr(),
            port: default_port(),
            static_dir: None,
            logging: LoggingConfig::default(),
        }
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse and validate a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: TomlConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with graceful degradation
    ///
    /// An explicit path is used as given; otherwise the platform config
    /// locations are searched. Any failure falls back to defaults with a
    /// warning.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let Some(path) = path else {
            info!("No config file found, using built-in defaults");
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{} - using built-in defaults", e);
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(Error::InvalidInput(format!(
                "logging.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }
        if self.bind_addr.trim().is_empty() {
            return Err(Error::Config("bind_addr must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Search the platform config locations for `safra/config.toml`
fn find_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("safra").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/safra/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Resolves the root data folder following the documented priority order
pub struct DataFolderResolver<'a> {
    cli_arg: Option<&'a Path>,
    toml: Option<&'a TomlConfig>,
}

impl<'a> DataFolderResolver<'a> {
    pub fn new(cli_arg: Option<&'a Path>, toml: Option<&'a TomlConfig>) -> Self {
        Self { cli_arg, toml }
    }

    pub fn resolve(&self) -> PathBuf {
        // Priority 1: Command-line argument
        if let Some(path) = self.cli_arg {
            return path.to_path_buf();
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(DATA_FOLDER_ENV) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }

        // Priority 3: TOML config file
        if let Some(path) = self.toml.and_then(|c| c.data_folder.as_ref()) {
            return path.clone();
        }

        // Priority 4: Compiled default
        PathBuf::from(DEFAULT_DATA_FOLDER)
    }
}

/// Locations of the input files below the data folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    /// Folder holding `<dataset>.feather` files
    pub processed_dir: PathBuf,
    /// State boundary GeoJSON document
    pub geojson_file: PathBuf,
}

impl DataPaths {
    pub fn from_root(root: &Path) -> Self {
        Self {
            processed_dir: root.join(PROCESSED_SUBDIR),
            geojson_file: root.join(GEOJSON_SUBDIR).join(GEOJSON_FILE),
        }
    }

    /// Path of the feather file backing a dataset
    pub fn feather(&self, dataset: &str) -> PathBuf {
        self.processed_dir.join(format!("{}.feather", dataset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.logging.level, "info");
        assert!(config.data_folder.is_none());
    }

    #[test]
    fn test_data_paths_layout() {
        let paths = DataPaths::from_root(Path::new("/srv/dados"));
        assert_eq!(paths.processed_dir, PathBuf::from("/srv/dados/processados"));
        assert_eq!(
            paths.geojson_file,
            PathBuf::from("/srv/dados/geojson/BrazilGeoJSON.geojson")
        );
        assert_eq!(
            paths.feather("area_nacional"),
            PathBuf::from("/srv/dados/processados/area_nacional.feather")
        );
    }

    #[test]
    fn test_cli_arg_wins() {
        let toml = TomlConfig {
            data_folder: Some(PathBuf::from("/from/toml")),
            ..TomlConfig::default()
        };
        let resolver = DataFolderResolver::new(Some(Path::new("/from/cli")), Some(&toml));
        assert_eq!(resolver.resolve(), PathBuf::from("/from/cli"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: TomlConfig = toml::from_str("port = 8080").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.logging.level, "info");
    }
}
