//! Engine configuration loaded from TOML.

use serde::Deserialize;
use std::path::Path;
use swapnet_types::{Symbol, TypeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid base symbol: {0}")]
    Symbol(#[from] TypeError),
}

/// Deployment settings for one network engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Account the engine acts as.
    pub network_account: String,
    /// Base asset symbol code, e.g. `SYS`.
    pub base_symbol: String,
    /// Base asset decimal precision.
    pub base_precision: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            network_account: "network".to_string(),
            base_symbol: "SYS".to_string(),
            base_precision: 4,
        }
    }
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn base_symbol(&self) -> Result<Symbol, ConfigError> {
        Ok(Symbol::new(&self.base_symbol, self.base_precision)?)
    }
}
