//! Snake Modes - a deterministic multi-mode Snake simulation
//!
//! This library provides:
//! - Core game logic for six modes: classic, modern, obstacles, timeattack,
//!   survival and chaos (game module)
//! - A score persistence port with an in-memory leaderboard (score module)
//! - Timer-driven and fast-forward round drivers plus an autopilot (play module)
//! - Session statistics (metrics module)

pub mod game;
pub mod logging;
pub mod metrics;
pub mod play;
pub mod score;
