use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, error, info};

use super::{
    action::Direction,
    collision::{food_hit, obstacle_collision, self_collision, wall_collision, Collision},
    config::{GameConfig, GameSpeed},
    grid::{Grid, Position},
    mode::{ChaosPhase, GameMode, ModePolicy, ObstaclePolicy, Pace, SpeedPolicy, Termination, WallPolicy},
    spawn::{generate_food, generate_obstacles},
    state::{GameOverReason, GameRunState, RunPhase, Snake},
};
use crate::score::{MemoryScoreStore, ScoreStore};

/// Round generation counter.
///
/// Timers are stamped with the epoch of the round that created them; the
/// engine ignores calls carrying any other epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Epoch(u64);

impl Epoch {
    fn next(self) -> Epoch {
        Epoch(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Final numbers of a round, produced once when it ends
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundSummary {
    pub epoch: Epoch,
    pub mode: GameMode,
    pub speed: GameSpeed,
    pub score: u32,
    pub high_score: u32,
    pub reason: GameOverReason,
    pub snake_length: usize,
    pub foods_eaten: u32,
    pub elapsed_secs: u32,
    pub ticks: u32,
}

/// Result of a movement tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Nothing happened: paused, finished, or a stale epoch
    Idle,
    /// Plain move, same length
    Moved,
    /// Growth tick; carries the freshly spawned food
    Ate { food: Position },
    /// The round just ended
    GameOver(RoundSummary),
}

/// Result of a 1 Hz clock step
#[derive(Debug, Clone, PartialEq)]
pub enum ClockOutcome {
    Idle,
    Counted,
    /// Chaos mode entered a new phase this second
    PhaseChanged(ChaosPhase),
    GameOver(RoundSummary),
}

/// The game engine that handles all game logic
pub struct GameEngine<S: ScoreStore = MemoryScoreStore> {
    config: GameConfig,
    grid: Grid,
    policy: ModePolicy,
    state: GameRunState,
    /// Latest accepted heading request, read once at the top of each tick
    pending_direction: Direction,
    epoch: Epoch,
    obstacles_placed: bool,
    store: S,
    rng: StdRng,
}

impl GameEngine<MemoryScoreStore> {
    /// Engine backed by a fresh in-memory score store
    pub fn in_memory(config: GameConfig) -> Self {
        Self::new(config, MemoryScoreStore::new())
    }
}

impl<S: ScoreStore> GameEngine<S> {
    /// Create an engine and start a classic round at normal speed
    pub fn new(config: GameConfig, store: S) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let grid = config.grid();
        let mode = GameMode::default();
        let state = blank_state(&config, mode, GameSpeed::default(), store.load_high_score());

        let mut engine = Self {
            config,
            grid,
            policy: mode.policy(),
            pending_direction: state.direction,
            state,
            epoch: Epoch(0),
            obstacles_placed: false,
            store,
            rng,
        };
        engine.reset(mode, GameSpeed::default());
        engine
    }

    /// Start a fresh round, invalidating every timer of the previous one
    pub fn reset(&mut self, mode: GameMode, speed: GameSpeed) -> &GameRunState {
        self.epoch = self.epoch.next();
        self.policy = mode.policy();
        self.obstacles_placed = false;
        self.state = blank_state(&self.config, mode, speed, self.store.load_high_score());
        self.pending_direction = self.state.direction;

        match generate_food(&self.state.snake.body, &self.grid, &mut self.rng) {
            Some(food) => self.state.food = food,
            None => {
                self.finish(GameOverReason::BoardFull);
                return &self.state;
            }
        }

        if self.policy.obstacles == ObstaclePolicy::AtStart {
            self.place_obstacles();
        }

        info!(
            epoch = self.epoch.value(),
            mode = %mode,
            speed = speed.as_str(),
            obstacles = self.state.obstacles.len(),
            "Round started"
        );
        &self.state
    }

    /// Queue a heading change for the next tick.
    ///
    /// A request that reverses the heading of the last tick is dropped.
    /// Returns whether the request was accepted.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.state.game_over() || direction.is_opposite(self.state.direction) {
            return false;
        }
        self.pending_direction = direction;
        true
    }

    /// Advance the snake by one cell
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_playing() {
            return TickOutcome::Idle;
        }

        let direction = self.pending_direction;
        self.state.direction = direction;
        self.state.ticks += 1;

        let raw_head = self.state.snake.head().advance(direction);
        let head = match self.policy.walls {
            WallPolicy::Lethal => {
                if wall_collision(raw_head, &self.grid) {
                    return self.collide(Collision::Wall);
                }
                raw_head
            }
            WallPolicy::Wrap => self.grid.wrap(raw_head),
        };

        if self.obstacles_deadly() && obstacle_collision(head, &self.state.obstacles) {
            return self.collide(Collision::Obstacle);
        }

        if food_hit(head, self.state.food) {
            // tail stays put on a growth tick, so it counts
            if self_collision(head, &self.state.snake.body) {
                return self.collide(Collision::SelfCollision);
            }
            self.state.snake.grow_to(head);
            self.on_food_eaten();

            // food does not avoid obstacles, only the snake
            match generate_food(&self.state.snake.body, &self.grid, &mut self.rng) {
                Some(food) => {
                    self.state.food = food;
                    TickOutcome::Ate { food }
                }
                None => {
                    error!(length = self.state.snake.len(), "No free cell left for food");
                    TickOutcome::GameOver(self.finish(GameOverReason::BoardFull))
                }
            }
        } else {
            if self_collision(head, self.state.snake.without_tail()) {
                return self.collide(Collision::SelfCollision);
            }
            self.state.snake.move_to(head);
            TickOutcome::Moved
        }
    }

    /// Tick on behalf of a timer created for `epoch`
    pub fn tick_for(&mut self, epoch: Epoch) -> TickOutcome {
        if epoch != self.epoch {
            debug!(stale = epoch.value(), current = self.epoch.value(), "Ignoring stale tick");
            return TickOutcome::Idle;
        }
        self.tick()
    }

    /// One second of round time: time attack countdown and chaos phases
    pub fn clock_second(&mut self) -> ClockOutcome {
        if !self.state.is_playing() {
            return ClockOutcome::Idle;
        }

        self.state.elapsed_secs += 1;

        if self.policy.termination == Termination::TimeLimit {
            let remaining = self.state.time_remaining.unwrap_or(0);
            if remaining <= 1 {
                self.state.time_remaining = Some(0);
                return ClockOutcome::GameOver(self.finish(GameOverReason::TimeUp));
            }
            self.state.time_remaining = Some(remaining - 1);
        }

        if self.policy.obstacles == ObstaclePolicy::Phased {
            let phase = ChaosPhase::at(self.state.elapsed_secs);
            if self.state.chaos_phase != Some(phase) {
                self.state.chaos_phase = Some(phase);
                if phase >= ChaosPhase::Two && !self.obstacles_placed {
                    self.place_obstacles();
                }
                info!(
                    phase = phase.number(),
                    elapsed = self.state.elapsed_secs,
                    interval_ms = self.tick_interval().as_millis() as u64,
                    "Chaos phase changed"
                );
                return ClockOutcome::PhaseChanged(phase);
            }
        }

        ClockOutcome::Counted
    }

    /// Clock step on behalf of a timer created for `epoch`
    pub fn clock_second_for(&mut self, epoch: Epoch) -> ClockOutcome {
        if epoch != self.epoch {
            debug!(stale = epoch.value(), current = self.epoch.value(), "Ignoring stale clock");
            return ClockOutcome::Idle;
        }
        self.clock_second()
    }

    /// Pause or resume; has no effect once the round is over
    pub fn toggle_pause(&mut self) -> RunPhase {
        self.state.phase = match self.state.phase {
            RunPhase::Playing => RunPhase::Paused,
            RunPhase::Paused => RunPhase::Playing,
            over @ RunPhase::GameOver(_) => over,
        };
        self.state.phase
    }

    /// Interval the scheduler should wait before the next tick
    pub fn tick_interval(&self) -> Duration {
        self.policy.speed.interval(Pace {
            base: self.state.speed.interval(),
            floor: self.config.min_interval(),
            survival_step: Duration::from_millis(self.config.survival_step_ms),
            speed_level: self.state.speed_level,
            elapsed_secs: self.state.elapsed_secs,
        })
    }

    /// Replace the round state, e.g. to resume a snapshot saved with serde.
    ///
    /// The buffered heading is reset to the snapshot's heading.
    pub fn restore(&mut self, state: GameRunState) {
        self.policy = state.mode.policy();
        self.obstacles_placed = !state.obstacles.is_empty();
        self.pending_direction = state.direction;
        self.state = state;
    }

    pub fn state(&self) -> &GameRunState {
        &self.state
    }

    pub fn snapshot(&self) -> GameRunState {
        self.state.clone()
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn policy(&self) -> ModePolicy {
        self.policy
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn obstacles_deadly(&self) -> bool {
        let phase = self.state.chaos_phase.unwrap_or(ChaosPhase::One);
        self.policy.obstacles.deadly(phase)
    }

    fn place_obstacles(&mut self) {
        self.state.obstacles = generate_obstacles(
            &self.state.snake.body,
            self.state.food,
            self.config.obstacle_count,
            &self.grid,
            &mut self.rng,
        );
        self.obstacles_placed = true;
        debug!(count = self.state.obstacles.len(), "Obstacles placed");
    }

    fn on_food_eaten(&mut self) {
        let state = &mut self.state;
        state.score += self.config.score_per_food;
        state.foods_eaten += 1;

        if state.score > state.high_score {
            state.high_score = state.score;
            self.store.save_high_score(state.score);
        }

        if self.policy.speed == SpeedPolicy::FoodRamp
            && state.foods_eaten % self.config.survival_foods_per_level == 0
        {
            state.speed_level += 1;
            debug!(level = state.speed_level, "Survival speed up");
        }

        debug!(
            score = state.score,
            length = state.snake.len(),
            "Food eaten"
        );
    }

    fn collide(&mut self, collision: Collision) -> TickOutcome {
        TickOutcome::GameOver(self.finish(GameOverReason::Collision(collision)))
    }

    fn finish(&mut self, reason: GameOverReason) -> RoundSummary {
        self.state.phase = RunPhase::GameOver(reason);

        let summary = RoundSummary {
            epoch: self.epoch,
            mode: self.state.mode,
            speed: self.state.speed,
            score: self.state.score,
            high_score: self.state.high_score,
            reason,
            snake_length: self.state.snake.len(),
            foods_eaten: self.state.foods_eaten,
            elapsed_secs: self.state.elapsed_secs,
            ticks: self.state.ticks,
        };
        info!(
            epoch = summary.epoch.value(),
            mode = %summary.mode,
            score = summary.score,
            reason = ?reason,
            "Game over"
        );
        summary
    }
}

fn blank_state(config: &GameConfig, mode: GameMode, speed: GameSpeed, high_score: u32) -> GameRunState {
    let direction = Direction::Right;
    let policy = mode.policy();
    let snake = Snake::new(
        config.grid().center(),
        direction,
        config.initial_snake_length,
    );

    GameRunState {
        mode,
        speed,
        food: snake.head(),
        snake,
        obstacles: Vec::new(),
        direction,
        score: 0,
        high_score,
        phase: RunPhase::Playing,
        time_remaining: (policy.termination == Termination::TimeLimit)
            .then_some(config.time_limit_secs),
        speed_level: 1,
        chaos_phase: (policy.obstacles == ObstaclePolicy::Phased).then_some(ChaosPhase::One),
        elapsed_secs: 0,
        foods_eaten: 0,
        ticks: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::ScoreSubmission;

    const SEED: u64 = 42;

    fn engine(mode: GameMode) -> GameEngine {
        let mut engine = GameEngine::in_memory(GameConfig::default().with_seed(SEED));
        engine.reset(mode, GameSpeed::Normal);
        engine
    }

    /// Put the round into a hand-made position
    fn place(engine: &mut GameEngine, body: &[(i32, i32)], food: (i32, i32), direction: Direction) {
        let mut state = engine.snapshot();
        state.snake = Snake::from_cells(body.iter().map(|&(x, y)| Position::new(x, y)).collect());
        state.food = Position::new(food.0, food.1);
        state.direction = direction;
        engine.restore(state);
    }

    #[test]
    fn test_reset() {
        let engine = engine(GameMode::Classic);
        let state = engine.state();

        assert!(state.is_playing());
        assert_eq!(state.score, 0);
        assert_eq!(state.ticks, 0);
        assert_eq!(state.snake.body, vec![Position::new(7, 7)]);
        assert_eq!(state.direction, Direction::Right);
        assert!(!state.snake.contains(state.food));
        assert!(state.obstacles.is_empty());
        assert_eq!(state.time_remaining, None);
        assert_eq!(state.chaos_phase, None);
    }

    #[test]
    fn test_reset_mode_extras() {
        let engine = engine(GameMode::TimeAttack);
        assert_eq!(engine.state().time_remaining, Some(60));

        let engine = self::engine(GameMode::Chaos);
        assert_eq!(engine.state().chaos_phase, Some(ChaosPhase::One));
        assert!(engine.state().obstacles.is_empty());

        let engine = self::engine(GameMode::Obstacles);
        let state = engine.state();
        assert_eq!(state.obstacles.len(), 8);
        for obstacle in &state.obstacles {
            assert_ne!(*obstacle, state.food);
            assert!(!state.snake.contains(*obstacle));
        }
    }

    #[test]
    fn test_reset_bumps_epoch() {
        let mut engine = engine(GameMode::Classic);
        let before = engine.epoch();
        engine.reset(GameMode::Modern, GameSpeed::Fast);
        assert!(engine.epoch() > before);
        assert_eq!(engine.state().mode, GameMode::Modern);
        assert_eq!(engine.tick_interval(), Duration::from_millis(120));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine(GameMode::Classic);
        place(&mut engine, &[(5, 5), (4, 5), (3, 5)], (0, 0), Direction::Right);

        assert_eq!(engine.tick(), TickOutcome::Moved);
        let state = engine.state();
        assert_eq!(state.ticks, 1);
        assert_eq!(
            state.snake.body,
            vec![Position::new(6, 5), Position::new(5, 5), Position::new(4, 5)]
        );
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine(GameMode::Classic);
        place(&mut engine, &[(5, 5), (4, 5), (3, 5)], (6, 5), Direction::Right);

        let outcome = engine.tick();
        let state = engine.state();

        let TickOutcome::Ate { food } = outcome.clone() else {
            panic!("expected a growth tick, got {outcome:?}");
        };
        assert_eq!(food, state.food);
        assert_eq!(state.score, 10);
        assert_eq!(state.high_score, 10);
        assert_eq!(state.foods_eaten, 1);
        assert_eq!(state.snake.len(), 4);
        assert!(!state.snake.contains(state.food));
        assert_eq!(engine.store().load_high_score(), 10);
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine(GameMode::Classic);
        place(&mut engine, &[(0, 5)], (5, 5), Direction::Left);

        let outcome = engine.tick();

        assert!(matches!(
            outcome,
            TickOutcome::GameOver(RoundSummary {
                reason: GameOverReason::Collision(Collision::Wall),
                ..
            })
        ));
        assert!(engine.state().game_over());
        // the snake is left where it was
        assert_eq!(engine.state().snake.head(), Position::new(0, 5));
    }

    #[test]
    fn test_modern_wraps() {
        let mut engine = engine(GameMode::Modern);
        place(&mut engine, &[(7, 0)], (5, 5), Direction::Up);

        assert_eq!(engine.tick(), TickOutcome::Moved);
        assert_eq!(engine.state().snake.head(), Position::new(7, 14));
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine(GameMode::Classic);
        // a hook shape: moving up from (5,6) lands on (5,5)
        place(
            &mut engine,
            &[(5, 6), (6, 6), (6, 5), (5, 5), (4, 5)],
            (0, 0),
            Direction::Left,
        );

        engine.set_direction(Direction::Up);
        let outcome = engine.tick();

        assert!(matches!(
            outcome,
            TickOutcome::GameOver(RoundSummary {
                reason: GameOverReason::Collision(Collision::SelfCollision),
                ..
            })
        ));
    }

    #[test]
    fn test_moving_into_vacating_tail_is_safe() {
        let mut engine = engine(GameMode::Classic);
        // 2x2 loop: head (5,5) moving down reaches the tail cell (5,6)
        place(&mut engine, &[(5, 5), (6, 5), (6, 6), (5, 6)], (0, 0), Direction::Left);

        engine.set_direction(Direction::Down);
        assert_eq!(engine.tick(), TickOutcome::Moved);
        assert_eq!(engine.state().snake.head(), Position::new(5, 6));
        assert_eq!(engine.state().snake.len(), 4);
    }

    #[test]
    fn test_eating_onto_tail_is_fatal() {
        let mut engine = engine(GameMode::Classic);
        // same loop, but the tail cell holds food so the tail does not move
        place(&mut engine, &[(5, 5), (6, 5), (6, 6), (5, 6)], (5, 6), Direction::Left);

        engine.set_direction(Direction::Down);
        assert!(matches!(
            engine.tick(),
            TickOutcome::GameOver(RoundSummary {
                reason: GameOverReason::Collision(Collision::SelfCollision),
                ..
            })
        ));
    }

    #[test]
    fn test_obstacle_collision() {
        let mut engine = engine(GameMode::Obstacles);
        place(&mut engine, &[(2, 2)], (10, 10), Direction::Right);
        let mut state = engine.snapshot();
        state.obstacles = vec![Position::new(3, 2)];
        engine.restore(state);

        assert!(matches!(
            engine.tick(),
            TickOutcome::GameOver(RoundSummary {
                reason: GameOverReason::Collision(Collision::Obstacle),
                ..
            })
        ));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine(GameMode::Classic);
        place(&mut engine, &[(5, 5), (4, 5)], (0, 0), Direction::Right);

        assert!(!engine.set_direction(Direction::Left));
        engine.tick();
        assert_eq!(engine.state().snake.head(), Position::new(6, 5));
        assert_eq!(engine.state().direction, Direction::Right);

        assert!(engine.set_direction(Direction::Up));
        engine.tick();
        assert_eq!(engine.state().snake.head(), Position::new(6, 4));
    }

    #[test]
    fn test_two_turns_between_ticks_cannot_reverse() {
        let mut engine = engine(GameMode::Classic);
        place(&mut engine, &[(5, 5), (4, 5)], (0, 0), Direction::Right);

        assert!(engine.set_direction(Direction::Up));
        // still the opposite of the heading the last tick used
        assert!(!engine.set_direction(Direction::Left));
        engine.tick();
        assert_eq!(engine.state().snake.head(), Position::new(5, 4));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = engine(GameMode::Classic);
        place(&mut engine, &[(14, 7)], (0, 0), Direction::Right);
        assert!(matches!(engine.tick(), TickOutcome::GameOver(_)));

        let ticks_before = engine.state().ticks;
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.clock_second(), ClockOutcome::Idle);
        assert!(!engine.set_direction(Direction::Up));
        assert_eq!(engine.state().ticks, ticks_before);
    }

    #[test]
    fn test_pause_freezes_round() {
        let mut engine = engine(GameMode::TimeAttack);
        assert_eq!(engine.toggle_pause(), RunPhase::Paused);

        let head = engine.state().snake.head();
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.clock_second(), ClockOutcome::Idle);
        assert_eq!(engine.state().snake.head(), head);
        assert_eq!(engine.state().time_remaining, Some(60));

        assert_eq!(engine.toggle_pause(), RunPhase::Playing);
        assert_ne!(engine.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_stale_epoch_ignored() {
        let mut engine = engine(GameMode::Classic);
        let old = engine.epoch();
        engine.reset(GameMode::Classic, GameSpeed::Normal);

        assert_eq!(engine.tick_for(old), TickOutcome::Idle);
        assert_eq!(engine.clock_second_for(old), ClockOutcome::Idle);
        assert_eq!(engine.state().ticks, 0);

        let current = engine.epoch();
        assert_ne!(engine.tick_for(current), TickOutcome::Idle);
    }

    #[test]
    fn test_time_attack_runs_out() {
        let mut engine = engine(GameMode::TimeAttack);

        for _ in 0..59 {
            assert_eq!(engine.clock_second(), ClockOutcome::Counted);
        }
        assert_eq!(engine.state().time_remaining, Some(1));

        let ClockOutcome::GameOver(summary) = engine.clock_second() else {
            panic!("time attack should end at zero");
        };
        assert_eq!(summary.reason, GameOverReason::TimeUp);
        assert_eq!(engine.state().time_remaining, Some(0));
        assert!(engine.state().game_over());
    }

    #[test]
    fn test_chaos_obstacles_generated_once() {
        let mut engine = engine(GameMode::Chaos);

        for _ in 0..59 {
            engine.clock_second();
        }
        assert_eq!(engine.state().chaos_phase, Some(ChaosPhase::One));
        assert!(engine.state().obstacles.is_empty());

        assert_eq!(engine.clock_second(), ClockOutcome::PhaseChanged(ChaosPhase::Two));
        let placed = engine.state().obstacles.clone();
        assert!(!placed.is_empty());

        assert_eq!(engine.clock_second(), ClockOutcome::Counted);
        assert_eq!(engine.state().obstacles, placed);
    }

    #[test]
    fn test_chaos_phase_three_speeds_up() {
        let mut engine = engine(GameMode::Chaos);
        assert_eq!(engine.tick_interval(), Duration::from_millis(180));

        for _ in 0..180 {
            engine.clock_second();
        }
        assert_eq!(engine.state().chaos_phase, Some(ChaosPhase::Three));
        assert_eq!(engine.tick_interval(), Duration::from_millis(90));

        for _ in 0..60 {
            engine.clock_second();
        }
        assert_eq!(engine.tick_interval(), Duration::from_millis(60));
    }

    #[test]
    fn test_chaos_obstacles_harmless_in_phase_one() {
        let mut engine = engine(GameMode::Chaos);
        place(&mut engine, &[(2, 2)], (10, 10), Direction::Right);
        let mut state = engine.snapshot();
        state.obstacles = vec![Position::new(3, 2)];
        engine.restore(state);

        assert_eq!(engine.tick(), TickOutcome::Moved);
    }

    #[test]
    fn test_chaos_obstacles_deadly_in_phase_two() {
        let mut engine = engine(GameMode::Chaos);
        for _ in 0..60 {
            engine.clock_second();
        }
        assert_eq!(engine.state().chaos_phase, Some(ChaosPhase::Two));

        place(&mut engine, &[(2, 2)], (10, 10), Direction::Right);
        let mut state = engine.snapshot();
        state.obstacles = vec![Position::new(3, 2)];
        engine.restore(state);

        let TickOutcome::GameOver(summary) = engine.tick() else {
            panic!("obstacle should be fatal in phase 2");
        };
        assert_eq!(summary.reason, GameOverReason::Collision(Collision::Obstacle));
        assert_eq!(engine.state().snake.head(), Position::new(2, 2));
    }

    #[test]
    fn test_chaos_obstacle_behind_wrapped_edge() {
        let mut engine = engine(GameMode::Chaos);
        for _ in 0..180 {
            engine.clock_second();
        }
        assert_eq!(engine.state().chaos_phase, Some(ChaosPhase::Three));

        place(&mut engine, &[(14, 5)], (10, 10), Direction::Right);
        let mut state = engine.snapshot();
        state.obstacles = vec![Position::new(0, 5)];
        engine.restore(state);

        assert_eq!(
            engine.tick(),
            TickOutcome::GameOver(RoundSummary {
                epoch: engine.epoch(),
                mode: GameMode::Chaos,
                speed: GameSpeed::Normal,
                score: 0,
                high_score: 0,
                reason: GameOverReason::Collision(Collision::Obstacle),
                snake_length: 1,
                foods_eaten: 0,
                elapsed_secs: 180,
                ticks: 1,
            })
        );
    }

    #[test]
    fn test_restore_saved_snapshot() {
        let mut engine = engine(GameMode::TimeAttack);
        place(&mut engine, &[(5, 5), (4, 5)], (12, 12), Direction::Right);
        engine.tick();
        engine.clock_second();

        let saved = serde_json::to_string(&engine.snapshot()).unwrap();
        let loaded: GameRunState = serde_json::from_str(&saved).unwrap();
        assert_eq!(&loaded, engine.state());

        let mut resumed = GameEngine::in_memory(GameConfig::default().with_seed(SEED + 1));
        resumed.restore(loaded);
        assert_eq!(resumed.state().time_remaining, Some(59));
        assert_eq!(resumed.tick(), TickOutcome::Moved);
        assert_eq!(resumed.state().snake.body, [Position::new(7, 5), Position::new(6, 5)]);
    }

    #[test]
    fn test_survival_speed_ramp() {
        let mut engine = engine(GameMode::Survival);
        assert_eq!(engine.tick_interval(), Duration::from_millis(180));

        // straight right from (7,7) leaves room for six foods
        for round in 1..=6 {
            let mut state = engine.snapshot();
            state.food = state.snake.head().advance(Direction::Right);
            engine.restore(state);
            assert!(matches!(engine.tick(), TickOutcome::Ate { .. }), "food {round}");
        }

        assert_eq!(engine.state().foods_eaten, 6);
        assert_eq!(engine.state().speed_level, 3);
        assert_eq!(engine.tick_interval(), Duration::from_millis(150));
    }

    #[test]
    fn test_high_score_carries_across_rounds() {
        let mut engine = engine(GameMode::Classic);
        place(&mut engine, &[(5, 5)], (6, 5), Direction::Right);
        engine.tick();
        assert_eq!(engine.state().high_score, 10);

        engine.reset(GameMode::Classic, GameSpeed::Normal);
        assert_eq!(engine.state().score, 0);
        assert_eq!(engine.state().high_score, 10);
    }

    #[test]
    fn test_store_accepts_final_score() {
        let mut engine = engine(GameMode::Classic);
        place(&mut engine, &[(14, 3)], (0, 0), Direction::Right);
        let TickOutcome::GameOver(summary) = engine.tick() else {
            panic!("expected wall collision");
        };

        let entry = ScoreSubmission::new("tester", summary.score, summary.mode, summary.speed).unwrap();
        engine.store_mut().submit_score(entry).unwrap();
        assert_eq!(engine.store().len(), 1);
    }
}
