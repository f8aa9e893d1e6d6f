use super::submission::{ScoreSubmission, SubmissionError};

/// Where high scores and leaderboard entries live.
///
/// The engine only talks to storage through this trait so rounds can run
/// against an in-memory store in tests and headless play.
pub trait ScoreStore {
    fn load_high_score(&self) -> u32;

    fn save_high_score(&mut self, score: u32);

    fn submit_score(&mut self, submission: ScoreSubmission) -> Result<(), SubmissionError>;
}

/// Entries kept by a [`MemoryScoreStore`] unless told otherwise
pub const LEADERBOARD_CAPACITY: usize = 50;

/// Session-local store: one high score and a score-ordered leaderboard
/// holding at most `capacity` entries
#[derive(Debug, Clone)]
pub struct MemoryScoreStore {
    high_score: u32,
    entries: Vec<ScoreSubmission>,
    capacity: usize,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::with_high_score(0)
    }

    pub fn with_high_score(high_score: u32) -> Self {
        Self {
            high_score,
            entries: Vec::new(),
            capacity: LEADERBOARD_CAPACITY,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self.entries.truncate(capacity);
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Best `n` entries, highest score first; ties keep submission order
    pub fn top(&self, n: usize) -> &[ScoreSubmission] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load_high_score(&self) -> u32 {
        self.high_score
    }

    fn save_high_score(&mut self, score: u32) {
        self.high_score = self.high_score.max(score);
    }

    fn submit_score(&mut self, submission: ScoreSubmission) -> Result<(), SubmissionError> {
        let at = self
            .entries
            .partition_point(|entry| entry.score >= submission.score);
        self.entries.insert(at, submission);
        self.entries.truncate(self.capacity);
        Ok(())
    }
}

impl Default for MemoryScoreStore {
    fn default() -> Self {
        Self::new()
    }
}
