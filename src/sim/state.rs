//! Session state and simulation events
//!
//! A `GameSession` lives from game start until reset, which replaces it
//! wholesale.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::input::InputMode;
use super::lifecycle::Lifecycle;
use crate::leaderboard::ScoreRecord;

/// Per-run counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    /// Never decreases within a session
    pub score: u64,
    pub health: u32,
    /// Starts at 1
    pub level: u32,
    pub lifecycle: Lifecycle,
    pub input_mode: InputMode,
    /// Clock firings processed while running
    pub ticks: u64,
}

impl GameSession {
    pub fn new(health: u32) -> Self {
        Self {
            score: 0,
            health,
            level: 1,
            lifecycle: Lifecycle::Running,
            input_mode: InputMode::Unset,
            ticks: 0,
        }
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Snake ran into itself
    SelfCollision,
    /// Health reached zero
    Defeated,
    /// No free cell left to place food
    BoardFilled,
}

/// Things that happened during a tick, for hosts (sound, HUD, persistence)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    FoodEaten { score: u64 },
    /// `at` is where the enemy was shot down
    EnemyDestroyed { enemy: u32, projectile: u32, at: Vec2 },
    /// Enemy left the board past the player
    EnemyEscaped { enemy: u32 },
    /// Enemy rammed the player and was destroyed
    EnemyCrashed { enemy: u32 },
    PlayerHit { damage: u32, health: u32 },
    LevelCompleted { level: u32, bonus: u64 },
    WaveSpawned { level: u32, size: u32 },
    Paused,
    Resumed,
    GameOver { reason: GameOverReason, record: ScoreRecord },
    Reset,
}
