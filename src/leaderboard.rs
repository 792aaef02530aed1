//! Score records and a per-game top-N leaderboard
//!
//! The engine only produces [`ScoreRecord`]s; keeping and ranking them is up
//! to the host. [`Leaderboard`] is a ready-made in-memory store that
//! serializes to JSON for whatever persistence the host has.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::GameId;
use crate::error::EngineError;

/// Maximum number of scores kept per game
pub const MAX_HIGH_SCORES: usize = 10;

/// Result of one finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub username: String,
    pub score: u64,
    pub game_id: GameId,
    /// Host time (ms) when the run ended
    pub timestamp_ms: u64,
}

impl ScoreRecord {
    pub fn new(username: &str, score: u64, game_id: GameId, timestamp_ms: u64) -> Self {
        Self {
            username: username.to_string(),
            score,
            game_id,
            timestamp_ms,
        }
    }
}

/// Top scores per game, sorted descending
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    boards: BTreeMap<String, Vec<ScoreRecord>>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score would make the board for `game_id`
    pub fn qualifies(&self, game_id: GameId, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        let entries = self.top(game_id);
        if entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        entries.last().is_none_or(|e| score > e.score)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, game_id: GameId, score: u64) -> Option<usize> {
        if !self.qualifies(game_id, score) {
            return None;
        }
        let entries = self.top(game_id);
        let rank = entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(entries.len()) + 1)
    }

    /// Insert a record if it qualifies. Returns the rank achieved.
    ///
    /// Ties keep the earlier record ahead.
    pub fn add(&mut self, record: ScoreRecord) -> Option<usize> {
        let rank = self.potential_rank(record.game_id, record.score)?;
        let entries = self
            .boards
            .entry(record.game_id.as_str().to_string())
            .or_default();
        log::info!(
            "{} ranked #{} on {} with {}",
            record.username,
            rank,
            record.game_id.as_str(),
            record.score
        );
        entries.insert(rank - 1, record);
        entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Entries for one game, best first
    pub fn top(&self, game_id: GameId) -> &[ScoreRecord] {
        self.boards
            .get(game_id.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn top_score(&self, game_id: GameId) -> Option<u64> {
        self.top(game_id).first().map(|e| e.score)
    }

    pub fn is_empty(&self) -> bool {
        self.boards.values().all(Vec::is_empty)
    }

    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let mut board: Self = serde_json::from_str(json)?;
        // Stored data may come from anywhere; restore the ordering invariant
        for entries in board.boards.values_mut() {
            entries.sort_by(|a, b| b.score.cmp(&a.score));
            entries.truncate(MAX_HIGH_SCORES);
        }
        Ok(board)
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string(self)?)
    }
}
