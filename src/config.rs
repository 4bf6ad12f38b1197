use bevy::prelude::*;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] io::Error),
    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunables of the random walk applied on every tick.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_seconds: f64,
    /// Upper bound (exclusive) of the progress gained per tick, in percent.
    pub max_progress_step: f64,
    /// Chance per tick that a train is considered for a status change.
    pub event_chance: f64,
    pub delay_chance: f64,
    pub recovery_chance: f64,
    pub max_delay_minutes: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            tick_seconds: 3.0,
            max_progress_step: 3.0,
            event_chance: 0.08,
            delay_chance: 0.3,
            recovery_chance: 0.4,
            max_delay_minutes: 10,
        }
    }
}

impl SimulationConfig {
    /// Faster-moving variant with more frequent disruptions.
    pub fn lively() -> Self {
        SimulationConfig {
            max_progress_step: 5.0,
            event_chance: 0.1,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("simulation.tick_seconds", self.tick_seconds)?;
        positive("simulation.max_progress_step", self.max_progress_step)?;
        probability("simulation.event_chance", self.event_chance)?;
        probability("simulation.delay_chance", self.delay_chance)?;
        probability("simulation.recovery_chance", self.recovery_chance)?;
        if self.max_delay_minutes == 0 {
            return Err(ConfigError::Invalid {
                field: "simulation.max_delay_minutes",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

#[derive(Resource, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Whether ticks run from startup.
    pub live: bool,
    pub route_filter: String,
    pub seed: Option<u64>,
    pub run_for_seconds: Option<f64>,
    pub simulation: SimulationConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            live: true,
            route_filter: crate::fleet::ALL_ROUTES.to_owned(),
            seed: None,
            run_for_seconds: None,
            simulation: SimulationConfig::default(),
        }
    }
}

impl TrackerConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<TrackerConfig, ConfigError> {
        let contents = fs::read_to_string(path)?;
        contents.parse()
    }

    /// Like [`TrackerConfig::load_from_file`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<TrackerConfig, ConfigError> {
        match TrackerConfig::load_from_file(path) {
            Err(ConfigError::Io(err)) if err.kind() == io::ErrorKind::NotFound => Ok(TrackerConfig::default()),
            other => other,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(limit) = self.run_for_seconds {
            positive("run_for_seconds", limit)?;
        }
        self.simulation.validate()
    }
}

impl std::str::FromStr for TrackerConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: TrackerConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a positive number, got {value}"),
        })
    }
}

fn probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a probability in [0, 1], got {value}"),
        })
    }
}
