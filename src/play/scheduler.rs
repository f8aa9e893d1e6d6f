//! Timer-driven round loop.
//!
//! One task, one `select!`: the movement interval, the 1 Hz round clock and
//! the command channel never run concurrently. Timers belong to the round
//! ([`Epoch`]) they were started for; a reset drops them before the new
//! round's timers are created, and a finished round stops polling them.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::game::{ClockOutcome, Command, Epoch, GameEngine, GameRunState, RoundSummary, TickOutcome};
use crate::score::ScoreStore;

const CLOCK_PERIOD: Duration = Duration::from_secs(1);

/// Read-only view of a running round.
///
/// Observers get a borrowed snapshot after every event and may react by
/// sending commands on their own channel handle.
pub trait RoundObserver {
    fn on_tick(&mut self, _state: &GameRunState, _outcome: &TickOutcome) {}

    fn on_clock(&mut self, _state: &GameRunState, _outcome: &ClockOutcome) {}

    fn on_round_over(&mut self, _summary: &RoundSummary) {}
}

/// Observer that ignores everything
impl RoundObserver for () {}

struct RoundTimers {
    epoch: Epoch,
    movement: Interval,
    clock: Interval,
    period: Duration,
    active: bool,
}

impl RoundTimers {
    fn start<S: ScoreStore>(engine: &GameEngine<S>) -> Self {
        let period = engine.tick_interval();
        Self {
            epoch: engine.epoch(),
            movement: periodic(period),
            clock: periodic(CLOCK_PERIOD),
            period,
            active: !engine.state().game_over(),
        }
    }

    /// Re-arm the movement timer when the schedule changed
    fn retune(&mut self, period: Duration) {
        if period != self.period {
            debug!(
                from_ms = self.period.as_millis() as u64,
                to_ms = period.as_millis() as u64,
                "Tick interval changed"
            );
            self.period = period;
            self.movement = periodic(period);
        }
    }
}

fn periodic(period: Duration) -> Interval {
    // first tick after one full period, not immediately
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

/// Run rounds until `Command::Quit` arrives or every sender is dropped.
///
/// Returns the summary of every round that ended while the loop ran.
pub async fn drive<S, O>(
    engine: &mut GameEngine<S>,
    commands: &mut mpsc::Receiver<Command>,
    observer: &mut O,
) -> Vec<RoundSummary>
where
    S: ScoreStore,
    O: RoundObserver,
{
    let mut finished = Vec::new();
    let mut timers = RoundTimers::start(engine);

    loop {
        tokio::select! {
            // clock first when both are due
            biased;

            _ = timers.clock.tick(), if timers.active => {
                let outcome = engine.clock_second_for(timers.epoch);
                observer.on_clock(engine.state(), &outcome);
                if let ClockOutcome::GameOver(summary) = outcome {
                    timers.active = false;
                    observer.on_round_over(&summary);
                    finished.push(summary);
                } else {
                    timers.retune(engine.tick_interval());
                }
            }

            _ = timers.movement.tick(), if timers.active => {
                let outcome = engine.tick_for(timers.epoch);
                observer.on_tick(engine.state(), &outcome);
                if let TickOutcome::GameOver(summary) = outcome {
                    timers.active = false;
                    observer.on_round_over(&summary);
                    finished.push(summary);
                } else {
                    timers.retune(engine.tick_interval());
                }
            }

            command = commands.recv() => match command {
                Some(Command::Turn(direction)) => {
                    engine.set_direction(direction);
                }
                Some(Command::TogglePause) => {
                    let phase = engine.toggle_pause();
                    debug!(?phase, "Pause toggled");
                }
                Some(Command::Reset) => {
                    let (mode, speed) = (engine.state().mode, engine.state().speed);
                    drop(timers);
                    engine.reset(mode, speed);
                    timers = RoundTimers::start(engine);
                }
                Some(Command::Quit) | None => {
                    info!(rounds = finished.len(), "Scheduler stopped");
                    break;
                }
            },
        }
    }

    finished
}
