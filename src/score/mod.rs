//! Score persistence port and leaderboard submissions.

pub mod store;
pub mod submission;

pub use store::{MemoryScoreStore, ScoreStore, LEADERBOARD_CAPACITY};
pub use submission::{sanitize_player_name, ScoreSubmission, SubmissionError};
