//! Simulation configuration with documented constants
//!
//! Every tunable of the world loop lives here. Values can be loaded from a
//! TOML file; missing keys fall back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{MasError, Result};

/// How the heart orders the influences queued during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Apply in submission order
    #[default]
    Fifo,
    /// Apply every displacement before any property change, keeping
    /// submission order inside each class
    MovementFirst,
}

/// Configuration for the simulation systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === SPATIAL SYSTEM ===
    /// Size of each cell in the scene's sparse hash grid (world units)
    ///
    /// Roughly the radius of a typical sensor keeps partial-overlap queries
    /// down to a handful of cells.
    pub grid_cell_size: f32,

    // === RESOLUTION ===
    /// Ordering policy used by the heart when a tick is resolved
    pub resolution: ResolutionMode,

    /// Remove agents whose `health` reached its declared minimum
    ///
    /// Checked at the end of every pulse, so removals are only ever
    /// visible from the next tick on.
    pub cull_depleted: bool,

    // === BEHAVIOR ===
    /// Seed for the random walks of patrolling states
    pub seed: u64,

    /// Largest heading change (degrees) a patrol may take in one tick
    pub patrol_max_turn_deg: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_cell_size: 50.0,
            resolution: ResolutionMode::Fifo,
            cull_depleted: false,
            seed: 0,
            patrol_max_turn_deg: 22.0,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.grid_cell_size.is_finite() && self.grid_cell_size > 0.0) {
            return Err(MasError::InvalidConfig(format!(
                "grid_cell_size ({}) must be a positive number",
                self.grid_cell_size
            )));
        }

        if !(self.patrol_max_turn_deg.is_finite() && self.patrol_max_turn_deg >= 0.0) {
            return Err(MasError::InvalidConfig(format!(
                "patrol_max_turn_deg ({}) must be >= 0",
                self.patrol_max_turn_deg
            )));
        }

        Ok(())
    }
}
