//! Collision detection and resolution
//!
//! Three kinds of contact, each with its own resolution policy:
//! - self-collision of a segmented player (snake)
//! - actor contact between enemies and the player
//! - projectile vs enemy, resolved strictly one-for-one
//!
//! Resolution walks entities in id order so results are deterministic.

use std::collections::VecDeque;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// How close two entities must be to touch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Proximity {
    /// Same grid cell
    SameCell,
    /// Same cell or orthogonal neighbour (Manhattan distance <= 1)
    Adjacent,
    /// Euclidean distance threshold on a canvas
    Radius { radius: f32 },
}

impl Proximity {
    pub fn touches(self, a: Vec2, b: Vec2) -> bool {
        match self {
            Proximity::SameCell => a.round().as_ivec2() == b.round().as_ivec2(),
            Proximity::Adjacent => {
                let d = (a.round().as_ivec2() - b.round().as_ivec2()).abs();
                d.x + d.y <= 1
            }
            Proximity::Radius { radius } => a.distance_squared(b) <= radius * radius,
        }
    }
}

/// Collision rules a game opts into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CollisionRule {
    /// Head entering its own body ends the run
    SelfCollision,
    /// Enemy touching the player deals `damage` once per enemy per tick.
    /// With `consumes_enemy` the enemy is destroyed by the crash.
    ActorContact {
        damage: u32,
        proximity: Proximity,
        #[serde(default)]
        consumes_enemy: bool,
    },
    /// Projectiles destroy the first enemy within `proximity`
    ProjectileHit { proximity: Proximity },
}

/// True when `head` lands on any existing body cell.
///
/// Called before the tail is truncated, so moving into the current tail
/// cell counts as a hit.
pub fn hits_body(head: IVec2, body: &VecDeque<IVec2>) -> bool {
    body.contains(&head)
}

/// Outcome of one actor-contact pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactOutcome {
    /// Ids of the enemies touching the player this tick
    pub enemies: Vec<u32>,
    /// Health actually removed
    pub damage: u32,
}

/// Apply contact damage from every enemy touching `player` to `health`.
///
/// Health is floored at zero.
pub fn resolve_contacts(
    player: Vec2,
    health: &mut u32,
    enemies: &[Entity],
    proximity: Proximity,
    damage: u32,
) -> ContactOutcome {
    let touching: Vec<u32> = enemies
        .iter()
        .filter(|e| proximity.touches(e.pos, player))
        .map(|e| e.id)
        .collect();
    if touching.is_empty() {
        return ContactOutcome::default();
    }
    let hits = touching.len() as u32;
    let before = *health;
    *health = health.saturating_sub(damage.saturating_mul(hits));
    ContactOutcome {
        enemies: touching,
        damage: before - *health,
    }
}

/// A resolved projectile/enemy pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub projectile: u32,
    pub enemy: u32,
    /// Where the enemy was destroyed
    pub at: Vec2,
}

/// Match projectiles to enemies and remove both sides of every match.
///
/// Each projectile (in id order) takes the first enemy (in id order) within
/// `proximity`. A consumed projectile or enemy cannot be matched again, so
/// the number of enemies removed always equals the number of projectiles
/// removed.
pub fn resolve_projectile_hits(
    projectiles: &mut Vec<Entity>,
    enemies: &mut Vec<Entity>,
    proximity: Proximity,
) -> Vec<Hit> {
    let mut hits = Vec::new();
    let mut spent = Vec::new();

    for (p_idx, projectile) in projectiles.iter().enumerate() {
        let target = enemies
            .iter()
            .position(|e| proximity.touches(projectile.pos, e.pos));
        if let Some(e_idx) = target {
            let enemy = enemies.remove(e_idx);
            hits.push(Hit {
                projectile: projectile.id,
                enemy: enemy.id,
                at: enemy.pos,
            });
            spent.push(p_idx);
        }
    }

    for idx in spent.into_iter().rev() {
        projectiles.remove(idx);
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityKind;

    fn enemy(id: u32, x: f32, y: f32) -> Entity {
        Entity::new(id, EntityKind::Enemy, Vec2::new(x, y))
    }

    fn shot(id: u32, x: f32, y: f32) -> Entity {
        Entity::new(id, EntityKind::Projectile, Vec2::new(x, y))
    }

    #[test]
    fn test_proximity_kinds() {
        let a = Vec2::new(3.0, 3.0);
        assert!(Proximity::SameCell.touches(a, Vec2::new(3.0, 3.0)));
        assert!(!Proximity::SameCell.touches(a, Vec2::new(3.0, 4.0)));
        assert!(Proximity::Adjacent.touches(a, Vec2::new(3.0, 4.0)));
        assert!(!Proximity::Adjacent.touches(a, Vec2::new(4.0, 4.0)));
        let r = Proximity::Radius { radius: 5.0 };
        assert!(r.touches(Vec2::ZERO, Vec2::new(3.0, 4.0)));
        assert!(!r.touches(Vec2::ZERO, Vec2::new(3.0, 4.1)));
    }

    #[test]
    fn test_hits_body() {
        let body: VecDeque<IVec2> = [IVec2::new(1, 1), IVec2::new(1, 2)].into_iter().collect();
        assert!(hits_body(IVec2::new(1, 2), &body));
        assert!(!hits_body(IVec2::new(2, 2), &body));
    }

    #[test]
    fn test_contact_damage_once_per_enemy() {
        let mut health = 100;
        let enemies = [enemy(2, 5.0, 5.0), enemy(3, 5.0, 5.0), enemy(4, 9.0, 9.0)];
        let out = resolve_contacts(
            Vec2::new(5.0, 5.0),
            &mut health,
            &enemies,
            Proximity::SameCell,
            20,
        );
        assert_eq!(out.enemies, vec![2, 3]);
        assert_eq!(out.damage, 40);
        assert_eq!(health, 60);
    }

    #[test]
    fn test_contact_floors_health_at_zero() {
        let mut health = 10;
        let out = resolve_contacts(
            Vec2::ZERO,
            &mut health,
            &[enemy(2, 0.0, 0.0)],
            Proximity::SameCell,
            20,
        );
        assert_eq!(out.damage, 10);
        assert_eq!(health, 0);
    }

    #[test]
    fn test_one_enemy_per_projectile() {
        // Two enemies inside one projectile's reach: only the first goes
        let mut shots = vec![shot(10, 5.0, 5.0)];
        let mut enemies = vec![enemy(2, 5.0, 4.0), enemy(3, 5.0, 6.0)];
        let hits = resolve_projectile_hits(&mut shots, &mut enemies, Proximity::Adjacent);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].enemy, 2);
        assert!(shots.is_empty());
        assert_eq!(enemies.len(), 1);
    }

    #[test]
    fn test_no_double_kill() {
        // Two projectiles on one enemy: the second survives
        let mut shots = vec![shot(10, 5.0, 5.0), shot(11, 5.0, 5.0)];
        let mut enemies = vec![enemy(2, 5.0, 5.0)];
        let hits = resolve_projectile_hits(&mut shots, &mut enemies, Proximity::SameCell);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].projectile, 10);
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].id, 11);
        assert!(enemies.is_empty());
    }
}
