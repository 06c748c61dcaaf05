//! Logging infrastructure for sigscan.
//!
//! Log records always go to stderr (or a log file), never stdout, so prompts
//! and results stay machine-readable.

use crate::core::config::LoggingConfig;
use crate::core::error::{Error, Result};
use chrono::Local;
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::fs::{self, OpenOptions};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level
    pub level: LevelFilter,
    /// Log file path; stderr when unset
    pub file_path: Option<PathBuf>,
    /// Show timestamps
    pub timestamps: bool,
    /// Show module path
    pub module_path: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Warn,
            file_path: None,
            timestamps: true,
            module_path: false,
        }
    }
}

impl LogConfig {
    /// Create a log config from application config.
    pub fn from_config(config: &LoggingConfig) -> Self {
        let level = config.log_level.parse().unwrap_or(LevelFilter::Warn);

        Self {
            level,
            file_path: config.log_file.clone(),
            timestamps: config.timestamps,
            module_path: level >= LevelFilter::Debug,
        }
    }

    /// Create a verbose log config for CLI.
    pub fn verbose(self) -> Self {
        Self {
            level: LevelFilter::Debug,
            module_path: true,
            ..self
        }
    }

    /// Create a quiet log config (errors only).
    pub fn quiet(self) -> Self {
        Self {
            level: LevelFilter::Error,
            timestamps: false,
            module_path: false,
            ..self
        }
    }
}

/// Initialize the logging system.
pub fn init_logging(config: LogConfig) -> Result<()> {
    let mut builder = Builder::new();

    // Set the log level
    builder.filter_level(config.level);

    let colored = match &config.file_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::LoggerInit(format!("Failed to create log directory: {}", e))
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    Error::LoggerInit(format!("Failed to open {}: {}", path.display(), e))
                })?;
            builder.target(Target::Pipe(Box::new(file)));
            false
        }
        None => {
            builder.target(Target::Stderr);
            std::io::stderr().is_terminal()
        }
    };

    let timestamps = config.timestamps;
    let module_path = config.module_path;
    builder.format(move |buf, record| {
        let mut output = String::new();

        if timestamps {
            output.push_str(&format!("{} ", Local::now().format("%Y-%m-%d %H:%M:%S")));
        }

        output.push_str(&format!("[{}] ", level_tag(record.level(), colored)));

        if module_path {
            if let Some(path) = record.module_path() {
                output.push_str(&format!("{}: ", path));
            }
        }

        output.push_str(&format!("{}", record.args()));

        writeln!(buf, "{}", output)
    });

    builder
        .try_init()
        .map_err(|e| Error::LoggerInit(e.to_string()))?;

    log::debug!("Logging initialized with level: {:?}", config.level);
    Ok(())
}

fn level_tag(level: log::Level, colored: bool) -> &'static str {
    match (level, colored) {
        (log::Level::Error, true) => "\x1b[31mERROR\x1b[0m",
        (log::Level::Warn, true) => "\x1b[33mWARN\x1b[0m ",
        (log::Level::Info, true) => "\x1b[32mINFO\x1b[0m ",
        (log::Level::Debug, true) => "\x1b[34mDEBUG\x1b[0m",
        (log::Level::Trace, true) => "\x1b[35mTRACE\x1b[0m",
        (log::Level::Error, false) => "ERROR",
        (log::Level::Warn, false) => "WARN ",
        (log::Level::Info, false) => "INFO ",
        (log::Level::Debug, false) => "DEBUG",
        (log::Level::Trace, false) => "TRACE",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.level, LevelFilter::Warn);
        assert!(config.file_path.is_none());
    }

    #[test]
    fn test_log_config_from_config() {
        let logging = LoggingConfig {
            log_level: "trace".to_string(),
            log_file: Some(PathBuf::from("/tmp/sigscan.log")),
            timestamps: false,
        };
        let config = LogConfig::from_config(&logging);
        assert_eq!(config.level, LevelFilter::Trace);
        assert!(config.module_path);
        assert!(!config.timestamps);
        assert!(config.file_path.is_some());
    }

    #[test]
    fn test_log_config_verbose() {
        let config = LogConfig::default().verbose();
        assert_eq!(config.level, LevelFilter::Debug);
        assert!(config.module_path);
    }

    #[test]
    fn test_log_config_quiet() {
        let config = LogConfig::default().quiet();
        assert_eq!(config.level, LevelFilter::Error);
        assert!(!config.timestamps);
    }

    #[test]
    fn test_plain_level_tags() {
        assert_eq!(level_tag(log::Level::Error, false), "ERROR");
        assert!(level_tag(log::Level::Error, true).contains("ERROR"));
    }
}
