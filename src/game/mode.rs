//! Per-mode rule records.
//!
//! A round looks up its [`ModePolicy`] once at reset; the engine consults
//! the record instead of branching on the mode inside the tick.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::config::ConfigError;

/// Chaos mode enters phase 2 at this many elapsed seconds
pub const CHAOS_PHASE_TWO_SECS: u32 = 60;
/// Chaos mode enters phase 3 at this many elapsed seconds
pub const CHAOS_PHASE_THREE_SECS: u32 = 180;
/// Phase 3 speeds up once per this many seconds
pub const CHAOS_RAMP_SECS: u32 = 60;
pub const CHAOS_MAX_MULTIPLIER: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Classic,
    Modern,
    Obstacles,
    #[serde(rename = "timeattack")]
    TimeAttack,
    Survival,
    Chaos,
}

impl GameMode {
    pub const ALL: [GameMode; 6] = [
        GameMode::Classic,
        GameMode::Modern,
        GameMode::Obstacles,
        GameMode::TimeAttack,
        GameMode::Survival,
        GameMode::Chaos,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Modern => "modern",
            GameMode::Obstacles => "obstacles",
            GameMode::TimeAttack => "timeattack",
            GameMode::Survival => "survival",
            GameMode::Chaos => "chaos",
        }
    }

    pub fn policy(self) -> ModePolicy {
        match self {
            GameMode::Classic => ModePolicy::new(WallPolicy::Lethal),
            GameMode::Modern => ModePolicy::new(WallPolicy::Wrap),
            GameMode::Obstacles => ModePolicy {
                obstacles: ObstaclePolicy::AtStart,
                ..ModePolicy::new(WallPolicy::Lethal)
            },
            GameMode::TimeAttack => ModePolicy {
                termination: Termination::TimeLimit,
                ..ModePolicy::new(WallPolicy::Lethal)
            },
            GameMode::Survival => ModePolicy {
                speed: SpeedPolicy::FoodRamp,
                ..ModePolicy::new(WallPolicy::Lethal)
            },
            GameMode::Chaos => ModePolicy {
                walls: WallPolicy::Wrap,
                obstacles: ObstaclePolicy::Phased,
                speed: SpeedPolicy::Phased,
                termination: Termination::None,
            },
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownMode(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallPolicy {
    /// Leaving the grid ends the round
    Lethal,
    /// Leaving the grid re-enters from the opposite edge
    Wrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstaclePolicy {
    None,
    /// Placed once at reset, deadly for the whole round
    AtStart,
    /// Placed when chaos phase 2 begins, deadly from then on
    Phased,
}

impl ObstaclePolicy {
    pub fn deadly(self, phase: ChaosPhase) -> bool {
        match self {
            ObstaclePolicy::None => false,
            ObstaclePolicy::AtStart => true,
            ObstaclePolicy::Phased => phase >= ChaosPhase::Two,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedPolicy {
    /// Base interval for the chosen speed
    Constant,
    /// Survival: faster every few foods eaten
    FoodRamp,
    /// Chaos: constant until phase 3, then multiplied up over time
    Phased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Only collisions end the round
    None,
    /// The round also ends when the countdown hits zero
    TimeLimit,
}

/// Everything a round needs to know about its mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModePolicy {
    pub walls: WallPolicy,
    pub obstacles: ObstaclePolicy,
    pub speed: SpeedPolicy,
    pub termination: Termination,
}

impl ModePolicy {
    fn new(walls: WallPolicy) -> Self {
        Self {
            walls,
            obstacles: ObstaclePolicy::None,
            speed: SpeedPolicy::Constant,
            termination: Termination::None,
        }
    }
}

/// Inputs to the movement interval schedule
#[derive(Debug, Clone, Copy)]
pub struct Pace {
    pub base: Duration,
    pub floor: Duration,
    pub survival_step: Duration,
    pub speed_level: u32,
    pub elapsed_secs: u32,
}

impl SpeedPolicy {
    pub fn interval(self, pace: Pace) -> Duration {
        match self {
            SpeedPolicy::Constant => pace.base,
            SpeedPolicy::FoodRamp => {
                let shaved = pace.survival_step * pace.speed_level.saturating_sub(1);
                pace.base.saturating_sub(shaved).max(pace.floor)
            }
            SpeedPolicy::Phased => {
                let multiplier = chaos_multiplier(pace.elapsed_secs);
                if multiplier > 1 {
                    (pace.base / multiplier).max(pace.floor)
                } else {
                    pace.base
                }
            }
        }
    }
}

/// One of the three time-gated rule sets of chaos mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChaosPhase {
    /// Wrapping walls only
    One,
    /// Obstacles appear
    Two,
    /// Speed ramps up
    Three,
}

impl ChaosPhase {
    pub fn at(elapsed_secs: u32) -> Self {
        if elapsed_secs < CHAOS_PHASE_TWO_SECS {
            ChaosPhase::One
        } else if elapsed_secs < CHAOS_PHASE_THREE_SECS {
            ChaosPhase::Two
        } else {
            ChaosPhase::Three
        }
    }

    pub fn number(self) -> u8 {
        match self {
            ChaosPhase::One => 1,
            ChaosPhase::Two => 2,
            ChaosPhase::Three => 3,
        }
    }

    /// Short status text, e.g. `PHASE 3 (4x)`
    pub fn label(self, elapsed_secs: u32) -> String {
        match self {
            ChaosPhase::Three => format!("PHASE 3 ({}x)", chaos_multiplier(elapsed_secs)),
            phase => format!("PHASE {}", phase.number()),
        }
    }
}

/// Speed multiplier for chaos mode: 1 before phase 3, then 2x rising by one
/// each minute, capped at [`CHAOS_MAX_MULTIPLIER`].
pub fn chaos_multiplier(elapsed_secs: u32) -> u32 {
    if elapsed_secs < CHAOS_PHASE_THREE_SECS {
        return 1;
    }
    let minutes = (elapsed_secs - CHAOS_PHASE_THREE_SECS) / CHAOS_RAMP_SECS;
    (minutes + 2).min(CHAOS_MAX_MULTIPLIER)
}
