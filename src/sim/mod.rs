//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clock-driven steps only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod grid;
pub mod input;
pub mod lifecycle;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use collision::{CollisionRule, ContactOutcome, Hit, Proximity};
pub use entity::{Entity, EntityKind, EntityStore};
pub use grid::{Board, Canvas, Direction, Grid};
pub use input::{
    ControlCommand, HeldKeys, InputEvent, InputMode, InputResolver, Key, MovementModel,
    TouchButton,
};
pub use lifecycle::Lifecycle;
pub use scheduler::{Clock, ClockKind, Scheduler};
pub use state::{GameEvent, GameOverReason, GameSession};
pub use tick::Engine;
