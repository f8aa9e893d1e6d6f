use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::Grid;

/// Speed setting chosen before a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl GameSpeed {
    /// Base movement interval for this speed
    pub fn interval(self) -> Duration {
        Duration::from_millis(match self {
            GameSpeed::Slow => 300,
            GameSpeed::Normal => 180,
            GameSpeed::Fast => 120,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameSpeed::Slow => "slow",
            GameSpeed::Normal => "normal",
            GameSpeed::Fast => "fast",
        }
    }
}

impl FromStr for GameSpeed {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slow" => Ok(GameSpeed::Slow),
            "normal" => Ok(GameSpeed::Normal),
            "fast" => Ok(GameSpeed::Fast),
            other => Err(ConfigError::UnknownSpeed(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid must be at least 5x5, got {width}x{height}")]
    GridTooSmall { width: i32, height: i32 },
    #[error("initial snake length {length} does not fit a row of width {width}")]
    SnakeTooLong { length: usize, width: i32 },
    #[error("minimum tick interval must be non-zero")]
    ZeroMinInterval,
    #[error("survival ramp needs at least one food per level")]
    ZeroFoodsPerLevel,
    #[error("unknown speed '{0}' (expected slow, normal or fast)")]
    UnknownSpeed(String),
    #[error("unknown game mode '{0}'")]
    UnknownMode(String),
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: i32,
    /// Height of the game grid
    pub grid_height: i32,
    /// Initial length of the snake, laid out behind the head
    pub initial_snake_length: usize,
    /// Points awarded per food item
    pub score_per_food: u32,
    /// Obstacles placed for obstacles mode and chaos phase 2
    pub obstacle_count: usize,
    /// Round length in time attack mode
    pub time_limit_secs: u32,
    /// Foods eaten per survival speed level
    pub survival_foods_per_level: u32,
    /// Interval shaved off per survival speed level
    pub survival_step_ms: u64,
    /// Fastest interval any schedule may reach
    pub min_interval_ms: u64,
    /// Fixed RNG seed; entropy when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 15,
            grid_height: 15,
            initial_snake_length: 1,
            score_per_food: 10,
            obstacle_count: 8,
            time_limit_secs: 60,
            survival_foods_per_level: 3,
            survival_step_ms: 15,
            min_interval_ms: 50,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Same configuration with a fixed RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load a JSON configuration file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width < 5 || self.grid_height < 5 {
            return Err(ConfigError::GridTooSmall {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        let fits = self.initial_snake_length >= 1
            && self.initial_snake_length as i32 <= self.grid_width / 2 + 1;
        if !fits {
            return Err(ConfigError::SnakeTooLong {
                length: self.initial_snake_length,
                width: self.grid_width,
            });
        }
        if self.min_interval_ms == 0 {
            return Err(ConfigError::ZeroMinInterval);
        }
        if self.survival_foods_per_level == 0 {
            return Err(ConfigError::ZeroFoodsPerLevel);
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_width, self.grid_height)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}
