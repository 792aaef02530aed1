//! Entities and the per-session entity store
//!
//! Positions are stored as `Vec2` for every board. On a grid they always hold
//! whole cell coordinates and are read back with [`Entity::cell`].

use std::collections::{HashSet, VecDeque};

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::grid::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    Projectile,
    /// Food or any other collectible
    Pickup,
}

/// A simulated object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    /// Facing of discrete movers
    pub heading: Direction,
    /// Per-tick displacement of continuous movers
    pub vel: Vec2,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            heading: Direction::None,
            vel: Vec2::ZERO,
        }
    }

    /// Grid cell this entity occupies
    #[inline]
    pub fn cell(&self) -> IVec2 {
        self.pos.round().as_ivec2()
    }

    #[inline]
    pub fn set_cell(&mut self, cell: IVec2) {
        self.pos = cell.as_vec2();
    }
}

/// All live entities of one game session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore {
    /// The singleton player
    pub player: Entity,
    /// Body cells of a segmented player, head first. Empty when unused.
    pub segments: VecDeque<IVec2>,
    /// Sorted by id
    pub enemies: Vec<Entity>,
    /// Sorted by id
    pub projectiles: Vec<Entity>,
    /// Sorted by id
    pub pickups: Vec<Entity>,
    next_id: u32,
}

impl EntityStore {
    /// Create a store holding only the player (id 1)
    pub fn new(player_pos: Vec2) -> Self {
        Self {
            player: Entity::new(1, EntityKind::Player, player_pos),
            segments: VecDeque::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            next_id: 2,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Create an entity of `kind` at `pos` and return it for tweaking.
    ///
    /// Spawning a `Player` relocates the singleton instead of adding one.
    pub fn spawn(&mut self, kind: EntityKind, pos: Vec2) -> &mut Entity {
        if kind == EntityKind::Player {
            self.player.pos = pos;
            return &mut self.player;
        }
        let id = self.next_entity_id();
        let list = match kind {
            EntityKind::Enemy => &mut self.enemies,
            EntityKind::Projectile => &mut self.projectiles,
            EntityKind::Pickup | EntityKind::Player => &mut self.pickups,
        };
        list.push(Entity::new(id, kind, pos));
        let last = list.len() - 1;
        &mut list[last]
    }

    /// Remove an entity by id; the player cannot be removed
    pub fn remove(&mut self, kind: EntityKind, id: u32) -> Option<Entity> {
        let list = match kind {
            EntityKind::Player => return None,
            EntityKind::Enemy => &mut self.enemies,
            EntityKind::Projectile => &mut self.projectiles,
            EntityKind::Pickup => &mut self.pickups,
        };
        let idx = list.iter().position(|e| e.id == id)?;
        Some(list.remove(idx))
    }

    pub fn get(&self, kind: EntityKind, id: u32) -> Option<&Entity> {
        match kind {
            EntityKind::Player => (self.player.id == id).then_some(&self.player),
            EntityKind::Enemy => self.enemies.iter().find(|e| e.id == id),
            EntityKind::Projectile => self.projectiles.iter().find(|e| e.id == id),
            EntityKind::Pickup => self.pickups.iter().find(|e| e.id == id),
        }
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Player => 1,
            EntityKind::Enemy => self.enemies.len(),
            EntityKind::Projectile => self.projectiles.len(),
            EntityKind::Pickup => self.pickups.len(),
        }
    }

    /// Every entity, player first
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        std::iter::once(&self.player)
            .chain(self.enemies.iter())
            .chain(self.projectiles.iter())
            .chain(self.pickups.iter())
    }

    /// Cells taken by the player, its body, enemies and pickups
    pub fn occupied_cells(&self) -> HashSet<IVec2> {
        let mut cells: HashSet<IVec2> = self.segments.iter().copied().collect();
        cells.insert(self.player.cell());
        cells.extend(self.enemies.iter().map(Entity::cell));
        cells.extend(self.pickups.iter().map(Entity::cell));
        cells
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|e| e.id);
        self.pickups.sort_by_key(|e| e.id);
    }
}
