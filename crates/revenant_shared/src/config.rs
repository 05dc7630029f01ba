//! # Sync Configuration
//!
//! Loaded once at startup from TOML. Every key is optional:
//!
//! ```toml
//! initial_capacity = 512
//! protocol_version = 2
//! max_map_tiles = 1048576
//! tile_size = 32
//! log_drain_threshold = 10
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_ENTITY_CAPACITY, DRAIN_LOG_THRESHOLD, MAX_MAP_TILES, TILE_SIZE,
};
use crate::protocol::PROTOCOL_VERSION;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for [`SyncConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables for the entity table and the sync protocol.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Initial reserve of the entity store.
    pub initial_capacity: usize,
    /// Protocol version this side speaks.
    pub protocol_version: i32,
    /// Largest accepted map, in tiles (width * height).
    pub max_map_tiles: u32,
    /// Edge length of a map tile in position units.
    pub tile_size: u32,
    /// Drains touching at least this many entities log at info level.
    pub log_drain_threshold: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_ENTITY_CAPACITY,
            protocol_version: PROTOCOL_VERSION,
            max_map_tiles: MAX_MAP_TILES,
            tile_size: TILE_SIZE,
            log_drain_threshold: DRAIN_LOG_THRESHOLD,
        }
    }
}

impl SyncConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML and
    /// [`ConfigError::Invalid`] on out-of-range values.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`SyncConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad key.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.tile_size == 0 {
            return Err(ConfigError::Invalid("tile_size must be non-zero".into()));
        }
        if self.max_map_tiles == 0 {
            return Err(ConfigError::Invalid("max_map_tiles must be non-zero".into()));
        }
        Ok(())
    }
}
