//! World configuration
//!
//! Every knob has a default matching the classic carnival world: a 40x20
//! biome, twenty entities, a fifteen line event log and a 5% chance of a
//! world event per tick. Overrides can be loaded from a JSON file; missing
//! keys keep their defaults.
//!
//! ```
//! use carnival_core::config::WorldConfig;
//!
//! let config = WorldConfig::from_json_str(r#"{ "width": 10, "seed": 7 }"#).unwrap();
//! assert_eq!(config.width, 10);
//! assert_eq!(config.height, 20);
//! assert!(config.validate().is_empty());
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Parameters for creating a world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Starting number of entities
    pub population: u32,
    /// Number of narrative lines retained in the event log
    pub log_capacity: usize,
    /// Per-tick probability of a world event
    pub event_chance: f64,
    /// Spiral die scale used for world events
    pub event_die_scale: f64,
    /// Energy every entity starts with
    pub starting_energy: f64,
    /// Leading entities forced to be mystics
    pub min_mystics: u32,
    /// Entities after the mystics forced to be skeptics
    pub min_skeptics: u32,
    /// RNG seed (None = fresh entropy)
    pub seed: Option<u64>,
    /// Prefix of generated strain names
    pub strain_prefix: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 20,
            population: 20,
            log_capacity: 15,
            event_chance: 0.05,
            event_die_scale: 8.0,
            starting_energy: 60.0,
            min_mystics: 1,
            min_skeptics: 2,
            seed: None,
            strain_prefix: "NEVILLE".to_string(),
        }
    }
}

impl WorldConfig {
    /// Default world with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Validate the configuration. Returns a list of problems (empty = valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.width == 0 || self.height == 0 {
            errors.push(format!(
                "grid must be at least 1x1, got {}x{}",
                self.width, self.height
            ));
        }
        if self.log_capacity == 0 {
            errors.push("log_capacity must be at least 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.event_chance) {
            errors.push(format!(
                "event_chance must be within [0, 1], got {}",
                self.event_chance
            ));
        }
        if !(self.event_die_scale > 0.0 && self.event_die_scale.is_finite()) {
            errors.push(format!(
                "event_die_scale must be positive, got {}",
                self.event_die_scale
            ));
        }
        if !self.starting_energy.is_finite() {
            errors.push("starting_energy must be finite".to_string());
        }
        if self.strain_prefix.trim().is_empty() {
            errors.push("strain_prefix must not be empty".to_string());
        }

        errors
    }

    /// `Ok(self)` if valid, otherwise every problem found
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}
