//! Configuration management for termcore.
//!
//! Settings are read from `~/.termcore/config.toml`; every field is optional
//! and falls back to its default.
//!
//! ```toml
//! # Terminal type to emulate
//! term = "vt100"
//!
//! # Capability database (termcap format)
//! termcap = "/etc/termcap"
//!
//! cols = 80
//! rows = 24
//!
//! # trace, debug, info, warn, error; RUST_LOG takes precedence
//! log_level = "info"
//! log_file = "/tmp/termcore.log"
//!
//! [scanner]
//! max_params = 32
//! max_string_len = 4096
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::term::parser::{ScannerLimits, MAX_PARAMS, MAX_STRING_LEN};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Terminal type name to emulate
    pub term: String,
    /// Capability file path
    pub termcap: Option<PathBuf>,
    pub cols: u16,
    pub rows: u16,
    /// Log filter used when RUST_LOG is not set
    pub log_level: String,
    /// Log to this file instead of stderr
    pub log_file: Option<PathBuf>,
    pub scanner: ScannerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            term: "xterm".to_string(),
            termcap: None,
            cols: 80,
            rows: 24,
            log_level: "info".to_string(),
            log_file: None,
            scanner: ScannerConfig::default(),
        }
    }
}

/// Scanner limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub max_params: usize,
    pub max_string_len: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_params: MAX_PARAMS,
            max_string_len: MAX_STRING_LEN,
        }
    }
}

impl ScannerConfig {
    pub fn limits(&self) -> ScannerLimits {
        ScannerLimits {
            max_params: self.max_params.max(1),
            max_string_len: self.max_string_len,
        }
    }
}

impl Config {
    /// Load configuration from the default location, falling back to
    /// defaults when the file is missing or unreadable.
    pub fn load() -> Self {
        if let Some(path) = Self::get_config_path() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("{}; using defaults", e),
                }
            }
        }
        Self::default()
    }

    /// Load configuration from a specific file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get config file path
    pub fn get_config_path() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".termcore").join("config.toml"))
    }
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.term, "xterm");
        assert_eq!((config.cols, config.rows), (80, 24));
        assert_eq!(config.scanner.limits(), ScannerLimits::default());
    }

    #[test]
    fn test_partial_file() {
        let config: Config = toml::from_str(
            "term = \"vt100\"\nrows = 50\n[scanner]\nmax_string_len = 128\n",
        )
        .unwrap();
        assert_eq!(config.term, "vt100");
        assert_eq!(config.rows, 50);
        assert_eq!(config.cols, 80);
        assert_eq!(config.scanner.max_string_len, 128);
        assert_eq!(config.scanner.max_params, MAX_PARAMS);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            term: "vt220".into(),
            termcap: Some(PathBuf::from("/etc/termcap")),
            ..Config::default()
        };
        config.save(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "cols = \"wide\"").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
