use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::collision::Collision;
use super::config::GameSpeed;
use super::grid::Position;
use super::mode::{ChaosPhase, GameMode};

/// The snake in the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
}

impl Snake {
    /// Create a snake of `length` segments trailing behind `head`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        let back = direction.opposite();
        for i in 1..length.max(1) {
            let prev = body[i - 1];
            body.push(prev.advance(back));
        }

        Self { body }
    }

    pub fn from_cells(body: Vec<Position>) -> Self {
        debug_assert!(!body.is_empty(), "a snake needs at least a head");
        Self { body }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Every segment except the tail, i.e. the cells still occupied after a
    /// plain move
    pub fn without_tail(&self) -> &[Position] {
        &self.body[..self.body.len() - 1]
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Prepend a new head and keep the tail
    pub fn grow_to(&mut self, head: Position) {
        self.body.insert(0, head);
    }

    /// Prepend a new head and drop the tail
    pub fn move_to(&mut self, head: Position) {
        self.body.insert(0, head);
        self.body.pop();
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    Collision(Collision),
    /// Time attack countdown reached zero
    TimeUp,
    /// No free cell was left for food
    BoardFull,
}

/// Where a round is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Playing,
    Paused,
    GameOver(GameOverReason),
}

/// Complete state of one round, as read by front-ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRunState {
    pub mode: GameMode,
    pub speed: GameSpeed,
    pub snake: Snake,
    pub food: Position,
    pub obstacles: Vec<Position>,
    /// Heading used by the most recent tick
    pub direction: Direction,
    pub score: u32,
    pub high_score: u32,
    pub phase: RunPhase,
    /// Seconds left in time attack mode
    pub time_remaining: Option<u32>,
    /// Survival speed level, starting at 1
    pub speed_level: u32,
    /// Current chaos phase in chaos mode
    pub chaos_phase: Option<ChaosPhase>,
    /// Seconds the round has been running (playing time only)
    pub elapsed_secs: u32,
    pub foods_eaten: u32,
    pub ticks: u32,
}

impl GameRunState {
    pub fn game_over(&self) -> bool {
        matches!(self.phase, RunPhase::GameOver(_))
    }

    pub fn is_playing(&self) -> bool {
        self.phase == RunPhase::Playing
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        match self.phase {
            RunPhase::GameOver(reason) => Some(reason),
            _ => None,
        }
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.contains(pos)
    }

    /// Format the elapsed clock as `MM:SS`
    pub fn format_elapsed(&self) -> String {
        format_clock(self.elapsed_secs)
    }
}

pub fn format_clock(total_secs: u32) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
