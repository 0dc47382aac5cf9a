//! Configuration loading, root folder resolution and environment detection
//!
//! Settings come from (highest priority first):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. TOML config file
//! 4. Compiled defaults
//!
//! A missing config file is never fatal: the resolver starts with defaults
//! and logs a warning. A config file that exists but cannot be parsed is
//! reported as [`Error::Config`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory name used under the platform config/data directories
pub const APP_DIR_NAME: &str = "mbid-resolver";

/// Environment variable overriding the root folder
pub const ENV_ROOT_FOLDER: &str = "MBID_ROOT_FOLDER";

/// Environment variable overriding the config file location
pub const ENV_CONFIG_FILE: &str = "MBID_CONFIG";

/// Environment variable marking a volatile development environment
pub const ENV_DEV_MODE: &str = "MBID_DEV";

/// File name of the durable cache database inside the root folder
pub const DATABASE_FILE_NAME: &str = "mbid_cache.db";

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Root folder holding the durable cache database
    pub root_folder: Option<PathBuf>,
    /// Marks the process as a frequently restarted development instance
    pub dev_mode: Option<bool>,
    pub logging: LoggingConfig,
    pub cache: CacheQuotaConfig,
    pub musicbrainz: MusicBrainzConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Capacity quota of the persistent MBID cache
///
/// The defaults mirror a typical browser storage quota: a few thousand
/// entries and a few megabytes of key + value text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheQuotaConfig {
    /// Maximum number of stored entries
    pub max_entries: usize,
    /// Maximum total size of keys plus values in bytes
    pub max_bytes: usize,
}

impl Default for CacheQuotaConfig {
    fn default() -> Self {
        Self {
            max_entries: 5_000,
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

impl CacheQuotaConfig {
    /// Validate the quota
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(Error::Config("cache.max_entries must be greater than 0".to_string()));
        }
        if self.max_bytes == 0 {
            return Err(Error::Config("cache.max_bytes must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// MusicBrainz web service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicBrainzConfig {
    /// Web service root, e.g. `https://musicbrainz.org/ws/2`
    pub base_url: String,
    /// User-Agent header (required by MusicBrainz)
    pub user_agent: String,
    /// Minimum interval between two requests
    pub rate_limit_ms: u64,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for MusicBrainzConfig {
    fn default() -> Self {
        Self {
            base_url: "https://musicbrainz.org/ws/2".to_string(),
            user_agent: format!("mbid-resolver/{}", env!("CARGO_PKG_VERSION")),
            rate_limit_ms: 1000,
            timeout_secs: 30,
        }
    }
}

impl MusicBrainzConfig {
    /// Validate the web service settings
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::Config("musicbrainz.base_url must not be empty".to_string()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(Error::Config("musicbrainz.user_agent must not be empty".to_string()));
        }
        Ok(())
    }
}

impl TomlConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.cache.validate()?;
        self.musicbrainz.validate()
    }
}

/// Backing medium of the persistent MBID cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMedium {
    /// Cleared when the process exits
    Session,
    /// SQLite database in the root folder, survives restarts
    Durable,
}

impl StorageMedium {
    /// Select the medium for the given environment
    ///
    /// Development instances restart on every code change, so they keep
    /// their cache on disk. Regular instances live long enough for a
    /// session-scoped cache.
    pub fn for_environment(volatile: bool) -> Self {
        if volatile {
            StorageMedium::Durable
        } else {
            StorageMedium::Session
        }
    }
}

impl std::fmt::Display for StorageMedium {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageMedium::Session => write!(f, "session"),
            StorageMedium::Durable => write!(f, "durable"),
        }
    }
}

/// Locate the config file: explicit path, then `MBID_CONFIG`, then the
/// platform config directory
pub fn config_file_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(ENV_CONFIG_FILE) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}

/// Load the TOML config, falling back to defaults when the file is missing
/// or unreadable
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = path else {
        warn!("No config directory available, using default configuration");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        debug!("Config file {} not found, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read config file {}: {}. Using defaults", path.display(), e);
            return Ok(TomlConfig::default());
        }
    };

    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
    config.validate()?;

    Ok(config)
}

/// Resolve the root folder: CLI → `MBID_ROOT_FOLDER` → TOML → OS default
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ENV_ROOT_FOLDER) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(format!("./{}_data", APP_DIR_NAME.replace('-', "_"))))
}

/// Path of the durable cache database for a root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE_NAME)
}

/// Decide whether this process is a volatile development environment:
/// `--dev` flag → `MBID_DEV` → TOML `dev_mode` → false
pub fn is_volatile_environment(cli_flag: bool, config: &TomlConfig) -> bool {
    if cli_flag {
        return true;
    }

    if let Ok(value) = std::env::var(ENV_DEV_MODE) {
        match parse_bool_flag(&value) {
            Some(flag) => return flag,
            None => warn!("Ignoring unrecognized {} value: {:?}", ENV_DEV_MODE, value),
        }
    }

    config.dev_mode.unwrap_or(false)
}

/// Parse the usual spellings of a boolean flag
pub fn parse_bool_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TomlConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache.max_entries, 5_000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_zero_quota_rejected() {
        let mut config = TomlConfig::default();
        config.cache.max_entries = 0;
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.cache.max_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_bool_flag() {
        assert_eq!(parse_bool_flag("1"), Some(true));
        assert_eq!(parse_bool_flag(" TRUE "), Some(true));
        assert_eq!(parse_bool_flag("off"), Some(false));
        assert_eq!(parse_bool_flag("maybe"), None);
    }

    #[test]
    fn test_storage_medium_selection() {
        assert_eq!(StorageMedium::for_environment(true), StorageMedium::Durable);
        assert_eq!(StorageMedium::for_environment(false), StorageMedium::Session);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: TomlConfig = toml::from_str("[cache]\nmax_entries = 10\n").unwrap();
        assert_eq!(config.cache.max_entries, 10);
        assert_eq!(config.cache.max_bytes, CacheQuotaConfig::default().max_bytes);
        assert_eq!(config.musicbrainz, MusicBrainzConfig::default());
    }
}
