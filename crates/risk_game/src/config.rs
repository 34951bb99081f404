use risk_core::time::MIN_FIXED_DT;
use risk_core::Clock;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Highest fixed step rate the clock accepts.
pub const MAX_STEP_RATE_HZ: f64 = 1.0 / MIN_FIXED_DT;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config validation failed: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GameConfig {
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,
    /// Font assets to load at startup, relative to `asset_root`.
    #[serde(default)]
    pub fonts: Vec<PathBuf>,
    #[serde(default = "default_step_rate")]
    pub step_rate_hz: f64,
    #[serde(default = "default_max_accumulator")]
    pub max_accumulator: f64,
}

impl GameConfig {
    pub fn fixed_dt(&self) -> f64 {
        1.0 / self.step_rate_hz
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            asset_root: default_asset_root(),
            fonts: Vec::new(),
            step_rate_hz: default_step_rate(),
            max_accumulator: default_max_accumulator(),
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: GameConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &GameConfig) -> Result<(), ConfigError> {
    if config.step_rate_hz <= 0.0 || config.step_rate_hz > MAX_STEP_RATE_HZ {
        return Err(ConfigError::Invalid(format!(
            "step_rate_hz must be in (0, {MAX_STEP_RATE_HZ}], got {}",
            config.step_rate_hz
        )));
    }
    // The clock owns the timing limits; build one to check them.
    Clock::new(config.fixed_dt(), config.max_accumulator)
        .map_err(|err| ConfigError::Invalid(err.to_string()))?;
    if config.fonts.is_empty() {
        log::warn!("Config lists no fonts. This is allowed but often accidental.");
    }
    Ok(())
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("assets")
}

const fn default_step_rate() -> f64 {
    60.0
}

const fn default_max_accumulator() -> f64 {
    0.25
}
