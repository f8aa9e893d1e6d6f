//! Collision rules consulted by the engine once per tick.
//!
//! These are pure predicates; choosing which body slice to pass to
//! [`self_collision`] is the caller's job. On a growth tick the whole
//! pre-move body counts (the tail stays put), on a plain move the tail is
//! left out because it vacates the cell this tick.

use serde::{Deserialize, Serialize};

use super::grid::{Grid, Position};

/// Cause of a fatal move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    /// Snake left the grid under lethal walls
    Wall,
    /// Snake ran into its own body
    SelfCollision,
    /// Snake hit an active obstacle
    Obstacle,
}

pub fn wall_collision(head: Position, grid: &Grid) -> bool {
    !grid.in_bounds(head)
}

pub fn self_collision(head: Position, body: &[Position]) -> bool {
    body.contains(&head)
}

pub fn obstacle_collision(head: Position, obstacles: &[Position]) -> bool {
    obstacles.contains(&head)
}

pub fn food_hit(head: Position, food: Position) -> bool {
    head == food
}
