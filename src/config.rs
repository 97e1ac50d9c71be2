//! Simulation options
//!
//! Tuning constants are fixed (see `consts`); only the things a host needs to
//! pick per simulation live here.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_FRAME_WIDTH;

/// Per-simulation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Width of the visible frame; terrain is kept tiled up to here
    pub frame_width: f32,
    /// Seed for terrain and gem placement
    pub seed: u64,
    /// Spawn gems over gaps
    pub pickups_enabled: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frame_width: DEFAULT_FRAME_WIDTH,
            seed: 0x5EED,
            pickups_enabled: true,
        }
    }
}

/// Failure to load a `RunConfig`
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    InvalidFrameWidth { width: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::InvalidFrameWidth { width } => {
                write!(f, "frame width must be positive and finite, got {width}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::InvalidFrameWidth { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl RunConfig {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded run config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.frame_width.is_finite() || self.frame_width <= 0.0 {
            return Err(ConfigError::InvalidFrameWidth {
                width: self.frame_width,
            });
        }
        Ok(())
    }
}
