//! Arcade Engine - one tick-based core for small browser arcade games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, entities, input, collisions, clocks)
//! - `config`: Per-game configuration and the three built-in presets
//! - `snapshot`: Pure per-tick view handed to an external renderer
//! - `leaderboard`: Score records emitted on game over

pub mod config;
pub mod error;
pub mod leaderboard;
pub mod sim;
pub mod snapshot;

pub use config::{GameConfig, GameId};
pub use error::EngineError;
pub use leaderboard::{Leaderboard, ScoreRecord};
pub use sim::Engine;
pub use snapshot::Snapshot;

/// Game configuration constants
pub mod consts {
    /// Snake board (cells per side)
    pub const SNAKE_GRID_SIZE: i32 = 25;
    /// Snake step cadence
    pub const SNAKE_STEP_MS: u32 = 150;
    /// Initial snake body, head first
    pub const SNAKE_START: [(i32, i32); 3] = [(10, 10), (10, 11), (10, 12)];

    /// Top-down shooter board (cells per side)
    pub const SHOOTER_GRID_SIZE: i32 = 20;
    pub const SHOOTER_PLAYER_STEP_MS: u32 = 100;
    /// Enemies are slower than the player on purpose
    pub const SHOOTER_ENEMY_STEP_MS: u32 = 400;
    pub const SHOOTER_PROJECTILE_STEP_MS: u32 = 60;

    /// Space shooter canvas (pixels)
    pub const CANVAS_WIDTH: f32 = 480.0;
    pub const CANVAS_HEIGHT: f32 = 640.0;
    /// Player ship rests this far above the bottom edge
    pub const SHIP_BASELINE: f32 = 48.0;
    pub const SPACE_PLAYER_STEP_MS: u32 = 16;
    pub const SPACE_ENEMY_STEP_MS: u32 = 32;
    pub const SPACE_PROJECTILE_STEP_MS: u32 = 16;
    pub const SPACE_SPAWN_MS: u32 = 900;
    /// Per-tick displacement (pixels)
    pub const SHIP_SPEED: f32 = 6.0;
    pub const ALIEN_SPEED: f32 = 2.0;
    pub const LASER_SPEED: f32 = 10.0;
    pub const LASER_HIT_RADIUS: f32 = 24.0;
    pub const SHIP_CONTACT_RADIUS: f32 = 28.0;
    /// Aliens spawn at least this far from the side walls
    pub const SPAWN_MARGIN: f32 = 24.0;

    pub const PLAYER_START_HEALTH: u32 = 100;
    pub const CONTACT_DAMAGE: u32 = 20;
    pub const ESCAPE_DAMAGE: u32 = 10;

    /// Flat award per enemy or food consumed
    pub const POINTS_PER_KILL: u64 = 10;
    /// Level completion bonus, multiplied by the level just cleared
    pub const LEVEL_BONUS: u64 = 100;
    pub const INITIAL_WAVE_SIZE: u32 = 3;
    /// Next wave size is `WAVE_BASE + level`
    pub const WAVE_BASE: u32 = 3;
    /// Grid enemies never spawn closer than this to the player (Manhattan)
    pub const SAFE_SPAWN_DISTANCE: i32 = 3;

    /// Uniform random attempts before falling back to enumerating free cells
    pub const SPAWN_RANDOM_ATTEMPTS: u32 = 32;
    /// Maximum clock firings replayed by one `advance` call
    pub const MAX_CATCH_UP_TICKS: u32 = 64;
}
