use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use snake_modes::game::{
    Command, GameConfig, GameEngine, GameMode, GameRunState, GameSpeed, RoundSummary, TickOutcome,
};
use snake_modes::metrics::SessionMetrics;
use snake_modes::play::{self, Autopilot, RoundEnd, RoundObserver};
use snake_modes::score::{MemoryScoreStore, ScoreStore, ScoreSubmission};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "snake_modes")]
#[command(version, about = "Headless multi-mode Snake simulation driven by an autopilot")]
struct Cli {
    /// Game mode: classic, modern, obstacles, timeattack, survival or chaos
    #[arg(long, default_value = "classic")]
    mode: GameMode,

    /// Speed setting: slow, normal or fast
    #[arg(long, default_value = "normal")]
    speed: GameSpeed,

    /// Number of rounds to play
    #[arg(long, default_value = "1")]
    rounds: u32,

    /// Grid width (overrides the config file)
    #[arg(long)]
    width: Option<i32>,

    /// Grid height (overrides the config file)
    #[arg(long)]
    height: Option<i32>,

    /// RNG seed for reproducible rounds
    #[arg(long)]
    seed: Option<u64>,

    /// Name used for leaderboard submissions
    #[arg(long, default_value = "autopilot")]
    player: String,

    /// JSON game configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Give up on a round after this many seconds of game time
    #[arg(long, default_value = "600")]
    max_secs: u32,

    /// Run on real timers instead of fast-forwarding
    #[arg(long)]
    realtime: bool,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    snake_modes::logging::init(&cli.log_level)?;

    let config = build_config(&cli)?;
    let mut engine = GameEngine::in_memory(config);
    engine.reset(cli.mode, cli.speed);

    let mut metrics = SessionMetrics::new();
    let summaries = if cli.realtime {
        run_realtime(&mut engine, cli.rounds).await
    } else {
        run_fast_forward(&mut engine, &cli)
    };

    for summary in &summaries {
        metrics.on_round_over(summary);
        println!(
            "round {:>3}  {:<10} score {:>5}  length {:>3}  {:>5}s  {:?}",
            summary.epoch.value(),
            summary.mode.as_str(),
            summary.score,
            summary.snake_length,
            summary.elapsed_secs,
            summary.reason,
        );

        match ScoreSubmission::new(&cli.player, summary.score, summary.mode, summary.speed) {
            Ok(entry) => engine
                .store_mut()
                .submit_score(entry)
                .context("Failed to submit score")?,
            Err(e) => warn!(error = %e, "Score not submitted"),
        }
    }

    metrics.update();
    print_report(engine.store(), &metrics);
    Ok(())
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    config.validate().context("Invalid game configuration")?;
    Ok(config)
}

fn run_fast_forward(engine: &mut GameEngine, cli: &Cli) -> Vec<RoundSummary> {
    let mut summaries = Vec::new();

    for round in 0..cli.rounds {
        if round > 0 {
            engine.reset(cli.mode, cli.speed);
        }
        match play::play_round(engine, cli.max_secs) {
            RoundEnd::Finished(summary) => summaries.push(summary),
            RoundEnd::Stopped(state) => {
                warn!(
                    score = state.score,
                    elapsed = state.elapsed_secs,
                    "Round stopped at the time limit"
                );
            }
        }
    }

    summaries
}

/// Feeds autopilot turns into the scheduler and restarts finished rounds
struct AutopilotDriver {
    tx: mpsc::Sender<Command>,
    pilot: Autopilot,
    rounds_left: u32,
}

impl RoundObserver for AutopilotDriver {
    fn on_tick(&mut self, state: &GameRunState, outcome: &TickOutcome) {
        if matches!(outcome, TickOutcome::GameOver(_)) {
            return;
        }
        // the last free slot is kept for Reset/Quit
        if self.tx.capacity() <= 1 {
            debug!("Command queue busy, skipping turn");
            return;
        }
        if let Some(direction) = self.pilot.choose(state) {
            if let Err(e) = self.tx.try_send(Command::Turn(direction)) {
                debug!(error = %e, "Turn dropped");
            }
        }
    }

    fn on_round_over(&mut self, summary: &RoundSummary) {
        info!(score = summary.score, "Round finished");
        self.rounds_left = self.rounds_left.saturating_sub(1);
        let next = if self.rounds_left == 0 {
            Command::Quit
        } else {
            Command::Reset
        };
        if let Err(e) = self.tx.try_send(next) {
            warn!(error = %e, "Failed to queue round control command");
        }
    }
}

async fn run_realtime(engine: &mut GameEngine, rounds: u32) -> Vec<RoundSummary> {
    let (tx, mut rx) = mpsc::channel(32);
    let mut driver = AutopilotDriver {
        tx,
        pilot: Autopilot::new(engine.grid(), engine.policy().walls),
        rounds_left: rounds.max(1),
    };

    play::drive(engine, &mut rx, &mut driver).await
}

fn print_report(store: &MemoryScoreStore, metrics: &SessionMetrics) {
    println!();
    println!("{}", "=".repeat(60));
    println!("Leaderboard (high score {})", store.load_high_score());
    for (rank, entry) in store.top(10).iter().enumerate() {
        println!(
            "{:>2}. {:<20} {:>5}  {} / {}",
            rank + 1,
            entry.player_name,
            entry.score,
            entry.mode,
            entry.speed.as_str(),
        );
    }
    println!("{}", "=".repeat(60));
    println!("{}", metrics.format_summary());
}
