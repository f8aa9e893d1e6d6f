//! Greedy direction chooser used by the headless driver.
//!
//! Not a strong player. It avoids moves that are fatal next tick, prefers
//! moves that leave at least a snake's length of open space, and then
//! heads for the food.

use std::collections::{HashSet, VecDeque};

use crate::game::{Direction, GameRunState, Grid, Position, WallPolicy};

pub struct Autopilot {
    grid: Grid,
    walls: WallPolicy,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    direction: Direction,
    roomy: bool,
    distance: u32,
    straight: bool,
}

impl Autopilot {
    pub fn new(grid: Grid, walls: WallPolicy) -> Self {
        Self { grid, walls }
    }

    /// Pick the heading for the next tick, or `None` when every move is fatal
    pub fn choose(&self, state: &GameRunState) -> Option<Direction> {
        let head = state.snake.head();
        let heading = state.direction;

        Direction::ALL
            .into_iter()
            .filter(|d| !d.is_opposite(heading))
            .filter_map(|direction| {
                let next = self.step(head, direction)?;
                if self.blocked(state, next) {
                    return None;
                }
                Some(Candidate {
                    direction,
                    roomy: self.open_space(state, next) >= state.snake.len(),
                    distance: self.distance(next, state.food),
                    straight: direction == heading,
                })
            })
            .min_by_key(|c| (!c.roomy, c.distance, !c.straight))
            .map(|c| c.direction)
    }

    fn step(&self, from: Position, direction: Direction) -> Option<Position> {
        let raw = from.advance(direction);
        match self.walls {
            WallPolicy::Lethal => self.grid.in_bounds(raw).then_some(raw),
            WallPolicy::Wrap => Some(self.grid.wrap(raw)),
        }
    }

    fn blocked(&self, state: &GameRunState, cell: Position) -> bool {
        // obstacles are avoided even before chaos makes them deadly
        let body = if cell == state.food {
            &state.snake.body[..]
        } else {
            state.snake.without_tail()
        };
        body.contains(&cell) || state.obstacles.contains(&cell)
    }

    /// Cells reachable from `start`, counted up to the grid size
    fn open_space(&self, state: &GameRunState, start: Position) -> usize {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while let Some(cell) = queue.pop_front() {
            for direction in Direction::ALL {
                let Some(next) = self.step(cell, direction) else {
                    continue;
                };
                if seen.contains(&next)
                    || state.snake.without_tail().contains(&next)
                    || state.obstacles.contains(&next)
                {
                    continue;
                }
                seen.insert(next);
                queue.push_back(next);
            }
        }

        seen.len()
    }

    fn distance(&self, a: Position, b: Position) -> u32 {
        let dx = a.x.abs_diff(b.x);
        let dy = a.y.abs_diff(b.y);
        match self.walls {
            WallPolicy::Lethal => dx + dy,
            WallPolicy::Wrap => {
                let dx = dx.min(self.grid.width as u32 - dx);
                let dy = dy.min(self.grid.height as u32 - dy);
                dx + dy
            }
        }
    }
}
