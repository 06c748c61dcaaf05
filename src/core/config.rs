//! Configuration management for sigscan.

use crate::core::error::{Error, Result};
use crate::core::types::MAX_PATH_LEN;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Hard ceiling for `scan.max_path_len`.
const PATH_LEN_CEILING: usize = 4096;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scan-related settings
    pub scan: ScanConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Console output settings
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigLoad(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| Error::ConfigLoad(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::ConfigSave(format!("Failed to create config directory: {}", e))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| Error::ConfigSave(format!("Failed to write config file: {}", e)))
    }

    /// Load configuration from the default location, falling back to defaults.
    ///
    /// Nothing is written; use `config reset` to create the file.
    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();

        if config_path.exists() {
            match Self::load(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    log::warn!("Failed to load config, using defaults: {}", e);
                }
            }
        }

        Self::default()
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        Self::data_dir().join("config.json")
    }

    /// The explicitly given config file, or the default location.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path)
    }

    /// Get the application data directory.
    pub fn data_dir() -> PathBuf {
        #[cfg(windows)]
        {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("C:\\ProgramData"))
                .join("sigscan")
        }

        #[cfg(not(windows))]
        {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join("sigscan")
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.scan.max_path_len == 0 || self.scan.max_path_len > PATH_LEN_CEILING {
            return Err(Error::ConfigInvalid {
                field: "scan.max_path_len".to_string(),
                message: format!("Must be between 1 and {}", PATH_LEN_CEILING),
            });
        }

        if self.logging.log_level.parse::<log::LevelFilter>().is_err() {
            return Err(Error::ConfigInvalid {
                field: "logging.log_level".to_string(),
                message: "Must be one of off, error, warn, info, debug, trace".to_string(),
            });
        }

        Ok(())
    }
}

/// Scan-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Longest signature or target path accepted, in characters
    pub max_path_len: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_path_len: MAX_PATH_LEN,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (off, error, warn, info, debug, trace)
    pub log_level: String,
    /// Optional log file; console logging is used when unset
    pub log_file: Option<PathBuf>,
    /// Prefix log lines with a timestamp
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_file: None,
            timestamps: true,
        }
    }
}

/// Console output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Print the welcome banner before prompting
    pub show_banner: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { show_banner: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_path() {
        let dir = tempdir().unwrap();
        let explicit = dir.path().join("custom.json");
        assert_eq!(Config::resolve_path(Some(explicit.as_path())), explicit);
        assert_eq!(Config::resolve_path(None), Config::default_config_path());

        Config::default().save(&Config::resolve_path(Some(explicit.as_path()))).unwrap();
        assert!(explicit.exists());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scan.max_path_len, 255);
    }

    #[test]
    fn test_config_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("test_config.json");

        let mut config = Config::default();
        config.scan.max_path_len = 1024;
        config.output.show_banner = false;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.scan.max_path_len, 1024);
        assert!(!loaded.output.show_banner);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{ "logging": { "log_level": "debug" } }"#).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.logging.log_level, "debug");
        assert!(loaded.logging.timestamps);
        assert_eq!(loaded.scan.max_path_len, MAX_PATH_LEN);
    }

    #[test]
    fn test_invalid_config() {
        let mut config = Config::default();
        config.scan.max_path_len = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::ConfigLoad(_))));
    }
}
