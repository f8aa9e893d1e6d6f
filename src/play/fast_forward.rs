//! Virtual-clock round runner.
//!
//! Replays the same event order as the timer-driven scheduler (movement
//! ticks at the engine's current interval, re-armed from the moment the
//! interval changes, and a clock step every second) but
//! jumps straight from event to event, so a three-minute chaos round
//! finishes instantly. On a tie the clock step runs first.

use std::time::Duration;

use crate::game::{ClockOutcome, GameEngine, GameRunState, RoundSummary, TickOutcome};
use crate::score::ScoreStore;

use super::autopilot::Autopilot;

/// How a fast-forwarded round ended
#[derive(Debug, Clone, PartialEq)]
pub enum RoundEnd {
    Finished(RoundSummary),
    /// The virtual time limit was reached first; carries the last state
    Stopped(GameRunState),
}

/// Play the current round with the autopilot for at most `max_secs` of
/// virtual time
pub fn play_round<S: ScoreStore>(engine: &mut GameEngine<S>, max_secs: u32) -> RoundEnd {
    play_for(engine, Duration::from_secs(u64::from(max_secs)))
}

/// Like [`play_round`] with a finer-grained limit
pub fn play_for<S: ScoreStore>(engine: &mut GameEngine<S>, limit: Duration) -> RoundEnd {
    let pilot = Autopilot::new(engine.grid(), engine.policy().walls);

    let mut period = engine.tick_interval();
    let mut next_tick = period;
    let mut next_second = Duration::from_secs(1);

    loop {
        if engine.state().game_over() || next_tick.min(next_second) > limit {
            return RoundEnd::Stopped(engine.snapshot());
        }

        if next_second <= next_tick {
            let now = next_second;
            next_second = now + Duration::from_secs(1);
            if let ClockOutcome::GameOver(summary) = engine.clock_second() {
                return RoundEnd::Finished(summary);
            }
            // a new interval restarts the movement timer from now
            if engine.tick_interval() != period {
                period = engine.tick_interval();
                next_tick = now + period;
            }
        } else {
            let now = next_tick;
            if let Some(direction) = pilot.choose(engine.state()) {
                engine.set_direction(direction);
            }
            if let TickOutcome::GameOver(summary) = engine.tick() {
                return RoundEnd::Finished(summary);
            }
            period = engine.tick_interval();
            next_tick = now + period;
        }
    }
}
