//! Configuration file loading for the hot-seat binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Names shown for the two seats.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PlayersConfig {
    #[serde(default = "default_white")]
    pub white: String,
    #[serde(default = "default_black")]
    pub black: String,
}

impl Default for PlayersConfig {
    fn default() -> Self {
        PlayersConfig {
            white: default_white(),
            black: default_black(),
        }
    }
}

fn default_white() -> String {
    "White".to_string()
}

fn default_black() -> String {
    "Black".to_string()
}

/// Main configuration structure.
///
/// Uses `hotseat.toml` in the current directory by default.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct HotseatConfig {
    #[serde(default)]
    pub players: PlayersConfig,
    /// Print the board after every move. Defaults to true.
    #[serde(default = "default_show_board")]
    pub show_board: bool,
    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log")]
    pub log: String,
}

impl Default for HotseatConfig {
    fn default() -> Self {
        HotseatConfig {
            players: PlayersConfig::default(),
            show_board: default_show_board(),
            log: default_log(),
        }
    }
}

fn default_show_board() -> bool {
    true
}

fn default_log() -> String {
    "warn".to_string()
}

impl HotseatConfig {
    /// Loads the configuration from `path`, or from [`Self::config_path()`]
    /// when no path is given. A missing default file yields the defaults; a
    /// missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::read(path),
            None => {
                let default_path = Self::config_path();
                if default_path.exists() {
                    Self::read(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Returns the path to the default configuration file.
    pub fn config_path() -> PathBuf {
        PathBuf::from("hotseat.toml")
    }
}
