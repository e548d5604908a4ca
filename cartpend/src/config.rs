//! JSON configuration for the driver.
//!
//! Every field is optional; a missing file section falls back to the
//! defaults of the matching library config.

use anyhow::{Context, Result};
use ml::TrainerConfig;
use physics::CartPendulumConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub physics: CartPendulumConfig,
    pub trainer: TrainerConfig,
    /// Adam step size.
    pub learning_rate: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            physics: CartPendulumConfig::default(),
            trainer: TrainerConfig::default(),
            learning_rate: 1e-3,
        }
    }
}

impl AppConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON for this shape or
    /// the trainer settings are unusable.
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content).context("Failed to parse config")?;
        config.trainer.validate()?;
        Ok(config)
    }

    /// Loads the file at `path`, or the defaults when no path is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("In config file {}", path.display()))
    }
}
