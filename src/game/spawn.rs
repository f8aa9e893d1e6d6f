//! Random placement of food and obstacles.

use rand::seq::SliceRandom;
use rand::Rng;

use super::grid::{Grid, Position};

/// Attempts spent on each obstacle slot before it is skipped
pub const MAX_OBSTACLE_ATTEMPTS: usize = 100;

/// Obstacles never spawn closer than this to the snake's head
pub const MIN_HEAD_DISTANCE: u32 = 3;

/// Pick a free cell uniformly at random.
///
/// Returns `None` only when the snake covers the whole grid.
pub fn generate_food<R: Rng + ?Sized>(
    snake: &[Position],
    grid: &Grid,
    rng: &mut R,
) -> Option<Position> {
    let free: Vec<Position> = grid.cells().filter(|cell| !snake.contains(cell)).collect();
    free.choose(rng).copied()
}

/// Place up to `count` obstacles by rejection sampling.
///
/// A candidate is rejected if it lies on the snake, on the food, on an
/// already chosen obstacle, or within [`MIN_HEAD_DISTANCE`] of the head.
/// Slots that cannot be filled in [`MAX_OBSTACLE_ATTEMPTS`] tries are
/// skipped, so this always terminates.
pub fn generate_obstacles<R: Rng + ?Sized>(
    snake: &[Position],
    food: Position,
    count: usize,
    grid: &Grid,
    rng: &mut R,
) -> Vec<Position> {
    let mut obstacles = Vec::with_capacity(count);
    let head = snake.first().copied();

    for _ in 0..count {
        for _ in 0..MAX_OBSTACLE_ATTEMPTS {
            let candidate = Position::new(
                rng.gen_range(0..grid.width),
                rng.gen_range(0..grid.height),
            );

            let too_close = head.is_some_and(|h| candidate.manhattan(h) < MIN_HEAD_DISTANCE);
            if snake.contains(&candidate)
                || candidate == food
                || obstacles.contains(&candidate)
                || too_close
            {
                continue;
            }

            obstacles.push(candidate);
            break;
        }
    }

    obstacles
}
