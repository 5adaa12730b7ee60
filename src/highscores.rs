//! Local high score table
//!
//! Fed once per run from the frozen final result. Kept in memory and
//! serialized as JSON; where it is stored is up to the host.

use serde::{Deserialize, Serialize};

use crate::sim::FinalResult;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 50;

/// Name used when a player leaves the name field blank
pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
    pub level: u32,
    pub elapsed_seconds: u32,
}

/// High score leaderboard, sorted by score descending
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
    #[serde(default = "default_capacity")]
    capacity: usize,
}

fn default_capacity() -> usize {
    MAX_HIGH_SCORES
}

impl Default for HighScores {
    fn default() -> Self {
        Self::new()
    }
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::with_capacity(MAX_HIGH_SCORES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < self.capacity {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a finished run. Returns the rank achieved (1-indexed) or None.
    pub fn add(&mut self, name: &str, result: &FinalResult) -> Option<usize> {
        if !self.qualifies(result.score) {
            return None;
        }

        let entry = HighScoreEntry {
            name: player_name_or_default(name),
            score: result.score,
            level: result.level,
            elapsed_seconds: result.elapsed_seconds,
        };

        // Ties go after existing entries
        let pos = self.entries.iter().position(|e| result.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(self.capacity);
        log::info!("High score #{} recorded: {}", rank, result.score);

        Some(rank)
    }

    /// Best `limit` entries
    pub fn top(&self, limit: usize) -> &[HighScoreEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

fn player_name_or_default(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// Payload a score-submission backend expects for one finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub player_name: String,
    pub score: u64,
    pub level: u32,
    pub time: u32,
    pub game_duration: u32,
}

impl ScoreSubmission {
    pub fn new(player_name: &str, result: &FinalResult) -> Self {
        Self {
            player_name: player_name_or_default(player_name),
            score: result.score,
            level: result.level,
            time: result.elapsed_seconds,
            game_duration: result.elapsed_seconds,
        }
    }
}
