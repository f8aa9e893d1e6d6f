//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! A round is driven entirely through [`GameEngine`]; timers and input live in
//! [`crate::play`].

pub mod action;
pub mod collision;
pub mod config;
pub mod engine;
pub mod grid;
pub mod mode;
pub mod spawn;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use collision::Collision;
pub use config::{ConfigError, GameConfig, GameSpeed};
pub use engine::{ClockOutcome, Epoch, GameEngine, RoundSummary, TickOutcome};
pub use grid::{Grid, Position};
pub use mode::{ChaosPhase, GameMode, ModePolicy, ObstaclePolicy, SpeedPolicy, Termination, WallPolicy};
pub use state::{GameOverReason, GameRunState, RunPhase, Snake};
