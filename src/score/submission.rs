use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{GameMode, GameSpeed};

pub const MAX_SUBMITTED_SCORE: u32 = 99_999;
pub const MAX_NAME_CHARS: usize = 20;
pub const ANONYMOUS: &str = "Anonymous";
/// Replacement for names that contain a blocked word
pub const REPLACEMENT_NAME: &str = "Player";

/// Matched case-insensitively anywhere in the name
const BLOCKED_WORDS: [&str; 11] = [
    "fuck", "shit", "ass", "bitch", "damn", "crap", "dick", "pussy", "cock", "nigger", "faggot",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("player name must not be blank")]
    EmptyName,
    #[error("score {0} is outside 0..=99999")]
    ScoreOutOfRange(u32),
}

/// A validated leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub player_name: String,
    pub score: u32,
    pub mode: GameMode,
    pub speed: GameSpeed,
}

impl ScoreSubmission {
    pub fn new(
        player_name: &str,
        score: u32,
        mode: GameMode,
        speed: GameSpeed,
    ) -> Result<Self, SubmissionError> {
        if player_name.trim().is_empty() {
            return Err(SubmissionError::EmptyName);
        }
        if score > MAX_SUBMITTED_SCORE {
            return Err(SubmissionError::ScoreOutOfRange(score));
        }

        Ok(Self {
            player_name: sanitize_player_name(player_name),
            score,
            mode,
            speed,
        })
    }
}

/// Trim, cap at [`MAX_NAME_CHARS`] characters and drop anything that looks
/// like a markup tag. Names containing a blocked word become
/// [`REPLACEMENT_NAME`]; [`ANONYMOUS`] is used when nothing is left.
pub fn sanitize_player_name(name: &str) -> String {
    let truncated: String = name.trim().chars().take(MAX_NAME_CHARS).collect();
    let stripped = strip_tags(&truncated);

    let lower = stripped.to_lowercase();
    if BLOCKED_WORDS.iter().any(|word| lower.contains(word)) {
        return REPLACEMENT_NAME.to_string();
    }

    if stripped.is_empty() {
        ANONYMOUS.to_string()
    } else {
        stripped
    }
}

fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find('<') {
        match rest[open..].find('>') {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            // unterminated, keep it as text
            None => break,
        }
    }
    out.push_str(rest);
    out
}
