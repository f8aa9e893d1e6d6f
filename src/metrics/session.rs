use std::time::{Duration, Instant};

use crate::game::{GameMode, RoundSummary};

/// Running totals over every round played in one session
pub struct SessionMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub best_mode: Option<GameMode>,
    pub rounds_played: u32,
    pub total_food: u32,
    pub longest_snake: usize,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            best_score: 0,
            best_mode: None,
            rounds_played: 0,
            total_food: 0,
            longest_snake: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_round_over(&mut self, summary: &RoundSummary) {
        self.rounds_played += 1;
        self.total_food += summary.foods_eaten;
        self.longest_snake = self.longest_snake.max(summary.snake_length);
        if summary.score > self.best_score || self.best_mode.is_none() {
            self.best_score = self.best_score.max(summary.score);
            self.best_mode = Some(summary.mode);
        }
    }

    pub fn average_score(&self) -> f64 {
        if self.rounds_played == 0 {
            return 0.0;
        }
        // every food is worth the same, so food count stands in for score
        f64::from(self.total_food) / f64::from(self.rounds_played)
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }

    pub fn format_summary(&self) -> String {
        format!(
            "rounds: {}  best: {}{}  food/round: {:.1}  longest: {}  wall time: {}",
            self.rounds_played,
            self.best_score,
            self.best_mode
                .map(|mode| format!(" ({})", mode))
                .unwrap_or_default(),
            self.average_score(),
            self.longest_snake,
            self.format_time(),
        )
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}
