//! Configuration types for the simulation.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Gender;

/// Default size budget of a single cell
pub const DEFAULT_CELL_CAPACITY: u32 = 20;

/// World configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the world grid (number of columns)
    pub width: i32,
    /// Height of the world grid (number of rows)
    pub height: i32,
    /// Maximum summed agent size per cell
    pub cell_capacity: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            cell_capacity: DEFAULT_CELL_CAPACITY,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width < 1 || self.height < 1 {
            return Err(Error::InvalidConfig(format!(
                "grid must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if self.cell_capacity == 0 {
            return Err(Error::InvalidConfig(
                "cell capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Initial population parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Number of agents generated at startup
    pub initial_agents: usize,
    /// Last name given to every generated agent (one family)
    pub shared_last_name: Option<String>,
    /// Gender given to every generated agent; drawn per agent when unset
    pub gender: Option<Gender>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_agents: 5,
            shared_last_name: None,
            gender: None,
        }
    }
}

/// Simulation run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of days to simulate
    pub days: u64,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Shuffle the roster at the start of every day
    pub shuffle_order: bool,
    /// World configuration
    pub world: WorldConfig,
    /// Population configuration
    pub population: PopulationConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            days: 3,
            seed: 0,
            shuffle_order: false,
            world: WorldConfig::default(),
            population: PopulationConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        self.world.validate()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let world_config = WorldConfig::default();
        assert_eq!(world_config.width, 10);
        assert_eq!(world_config.height, 10);
        assert_eq!(world_config.cell_capacity, 20);

        let sim_config = SimConfig::default();
        assert_eq!(sim_config.days, 3);
        assert_eq!(sim_config.population.initial_agents, 5);
        assert!(sim_config.validate().is_ok());
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        let config = WorldConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = WorldConfig {
            cell_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json_str(r#"{"days": 7, "world": {"width": 4}}"#).unwrap();
        assert_eq!(config.days, 7);
        assert_eq!(config.world.width, 4);
        assert_eq!(config.world.height, 10);
        assert_eq!(config.population, PopulationConfig::default());
    }

    #[test]
    fn test_fixed_gender_from_json() {
        let config =
            SimConfig::from_json_str(r#"{"population": {"gender": "Female"}}"#).unwrap();
        assert_eq!(config.population.gender, Some(Gender::Female));

        let err = SimConfig::from_json_str(r#"{"population": {"gender": "Other"}}"#).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_json_rejects_invalid_world() {
        let err = SimConfig::from_json_str(r#"{"world": {"height": -3}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = SimConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
