//! Per-tick render snapshot
//!
//! Everything a renderer needs to draw one frame, and nothing else. Hosts
//! either read the struct directly or ship it across a boundary as JSON.

use glam::IVec2;
use serde::Serialize;

use crate::config::GameId;
use crate::error::EngineError;
use crate::sim::{Board, Engine, Entity, GameSession};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub game_id: GameId,
    pub board: Board,
    pub session: GameSession,
    pub best_score: u64,
    pub player: Entity,
    /// Snake body, head first
    pub segments: Vec<IVec2>,
    pub enemies: Vec<Entity>,
    pub projectiles: Vec<Entity>,
    pub pickups: Vec<Entity>,
    /// Enemies of the current wave still waiting to enter
    pub pending_spawns: u32,
}

impl Snapshot {
    pub fn capture(engine: &Engine) -> Self {
        let store = engine.store();
        Self {
            game_id: engine.config().game_id,
            board: engine.config().board,
            session: engine.session().clone(),
            best_score: engine.best_score(),
            player: store.player.clone(),
            segments: store.segments.iter().copied().collect(),
            enemies: store.enemies.clone(),
            projectiles: store.projectiles.clone(),
            pickups: store.pickups.clone(),
            pending_spawns: engine.pending_spawns(),
        }
    }

    /// Number of entities on the board, player included
    pub fn entity_count(&self) -> usize {
        1 + self.enemies.len() + self.projectiles.len() + self.pickups.len()
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string(self)?)
    }
}
