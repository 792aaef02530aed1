//! Per-game configuration
//!
//! The three games share one engine; everything that differs between them
//! lives in a `GameConfig`. Configs are plain serde data so hosts can ship
//! tweaked JSON instead of recompiling.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::EngineError;
use crate::sim::{Board, Canvas, ClockKind, CollisionRule, Direction, Grid, MovementModel, Proximity};

/// Which game a config (and a score) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameId {
    Snake,
    TopDownShooter,
    SpaceShooter,
}

impl GameId {
    pub const ALL: [GameId; 3] = [GameId::Snake, GameId::TopDownShooter, GameId::SpaceShooter];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameId::Snake => "snake",
            GameId::TopDownShooter => "top_down_shooter",
            GameId::SpaceShooter => "space_shooter",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "snake" => Some(GameId::Snake),
            "top_down_shooter" | "shooter" | "topdown" => Some(GameId::TopDownShooter),
            "space_shooter" | "space" => Some(GameId::SpaceShooter),
            _ => None,
        }
    }
}

/// Clock cadences; `None` disables a clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockSettings {
    pub movement_ms: u32,
    #[serde(default)]
    pub enemy_ms: Option<u32>,
    #[serde(default)]
    pub projectile_ms: Option<u32>,
    #[serde(default)]
    pub spawn_ms: Option<u32>,
}

impl ClockSettings {
    /// Enabled clocks in declaration order
    pub fn clocks(&self) -> Vec<(ClockKind, u32)> {
        let mut clocks = vec![(ClockKind::Movement, self.movement_ms)];
        let optional = [
            (ClockKind::Enemy, self.enemy_ms),
            (ClockKind::Projectile, self.projectile_ms),
            (ClockKind::Spawn, self.spawn_ms),
        ];
        clocks.extend(optional.iter().filter_map(|&(k, ms)| ms.map(|ms| (k, ms))));
        clocks
    }

    pub fn has(&self, kind: ClockKind) -> bool {
        self.clocks().iter().any(|(k, _)| *k == kind)
    }
}

/// Player entity setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSettings {
    pub start: Vec2,
    pub health: u32,
    pub heading: Direction,
    /// Pixels per movement tick on a canvas; grids always step one cell
    pub speed: f32,
    /// Ignore the vertical component of held-key movement
    #[serde(default)]
    pub horizontal_only: bool,
    /// Initial body cells, head first. Empty for unsegmented players.
    #[serde(default)]
    pub body: Vec<IVec2>,
    /// Fixed firing direction; `None` fires along the player's heading
    #[serde(default)]
    pub fire_direction: Option<Direction>,
}

/// Enemy waves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    pub initial_size: u32,
    /// Waves after the first hold `growth_base + level` enemies
    pub growth_base: u32,
    /// Canvas enemies: pixels per enemy tick
    pub enemy_speed: f32,
    /// Canvas projectiles: pixels per projectile tick
    pub projectile_speed: f32,
    /// Health lost when an enemy slips past the bottom edge
    pub escape_damage: u32,
    /// Minimum Manhattan distance between a new grid enemy and the player
    pub safe_distance: i32,
}

impl WaveConfig {
    pub fn size_for_level(&self, level: u32) -> u32 {
        if level <= 1 {
            self.initial_size
        } else {
            self.growth_base + level
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfig {
    pub points_per_kill: u64,
    /// Multiplied by the level just completed
    pub level_bonus: u64,
}

impl ScoreConfig {
    pub fn level_bonus(&self, level: u32) -> u64 {
        self.level_bonus * u64::from(level)
    }
}

/// Complete description of one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub game_id: GameId,
    pub board: Board,
    pub movement: MovementModel,
    pub has_levels: bool,
    pub collision_rules: Vec<CollisionRule>,
    pub clocks: ClockSettings,
    pub player: PlayerSettings,
    pub waves: WaveConfig,
    pub scoring: ScoreConfig,
    /// Food items kept on the board
    #[serde(default)]
    pub pickups: u32,
    /// Pause/reset keys stay live after touch locks out the keyboard
    pub controls_bypass_lock: bool,
}

impl GameConfig {
    /// Grid snake: wrapping board, no levels
    pub fn snake() -> Self {
        let body: Vec<IVec2> = SNAKE_START.iter().map(|&(x, y)| IVec2::new(x, y)).collect();
        Self {
            game_id: GameId::Snake,
            board: Board::Grid(Grid::new(SNAKE_GRID_SIZE, SNAKE_GRID_SIZE, true)),
            movement: MovementModel::DiscreteDirection {
                allow_reversal: false,
            },
            has_levels: false,
            collision_rules: vec![CollisionRule::SelfCollision],
            clocks: ClockSettings {
                movement_ms: SNAKE_STEP_MS,
                enemy_ms: None,
                projectile_ms: None,
                spawn_ms: None,
            },
            player: PlayerSettings {
                start: body[0].as_vec2(),
                health: PLAYER_START_HEALTH,
                heading: Direction::Up,
                speed: 1.0,
                horizontal_only: false,
                body,
                fire_direction: None,
            },
            waves: WaveConfig {
                initial_size: 0,
                growth_base: 0,
                enemy_speed: 0.0,
                projectile_speed: 0.0,
                escape_damage: 0,
                safe_distance: 0,
            },
            scoring: ScoreConfig {
                points_per_kill: POINTS_PER_KILL,
                level_bonus: 0,
            },
            pickups: 1,
            controls_bypass_lock: true,
        }
    }

    /// Top-down grid shooter: enemies chase the player cell by cell
    pub fn top_down_shooter() -> Self {
        let center = SHOOTER_GRID_SIZE / 2;
        Self {
            game_id: GameId::TopDownShooter,
            board: Board::Grid(Grid::new(SHOOTER_GRID_SIZE, SHOOTER_GRID_SIZE, false)),
            movement: MovementModel::HeldKeySet,
            has_levels: true,
            collision_rules: vec![
                CollisionRule::ActorContact {
                    damage: CONTACT_DAMAGE,
                    proximity: Proximity::SameCell,
                    consumes_enemy: false,
                },
                CollisionRule::ProjectileHit {
                    proximity: Proximity::Adjacent,
                },
            ],
            clocks: ClockSettings {
                movement_ms: SHOOTER_PLAYER_STEP_MS,
                enemy_ms: Some(SHOOTER_ENEMY_STEP_MS),
                projectile_ms: Some(SHOOTER_PROJECTILE_STEP_MS),
                spawn_ms: None,
            },
            player: PlayerSettings {
                start: Vec2::new(center as f32, center as f32),
                health: PLAYER_START_HEALTH,
                heading: Direction::Up,
                speed: 1.0,
                horizontal_only: false,
                body: Vec::new(),
                fire_direction: None,
            },
            waves: WaveConfig {
                initial_size: INITIAL_WAVE_SIZE,
                growth_base: WAVE_BASE,
                enemy_speed: 1.0,
                projectile_speed: 1.0,
                escape_damage: 0,
                safe_distance: SAFE_SPAWN_DISTANCE,
            },
            scoring: ScoreConfig {
                points_per_kill: POINTS_PER_KILL,
                level_bonus: LEVEL_BONUS,
            },
            pickups: 0,
            controls_bypass_lock: true,
        }
    }

    /// Vertical space shooter on a continuous canvas
    pub fn space_shooter() -> Self {
        Self {
            game_id: GameId::SpaceShooter,
            board: Board::Canvas(Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT, false)),
            movement: MovementModel::HeldKeySet,
            has_levels: true,
            collision_rules: vec![
                CollisionRule::ActorContact {
                    damage: CONTACT_DAMAGE,
                    proximity: Proximity::Radius {
                        radius: SHIP_CONTACT_RADIUS,
                    },
                    // Aliens ram the ship and break up
                    consumes_enemy: true,
                },
                CollisionRule::ProjectileHit {
                    proximity: Proximity::Radius {
                        radius: LASER_HIT_RADIUS,
                    },
                },
            ],
            clocks: ClockSettings {
                movement_ms: SPACE_PLAYER_STEP_MS,
                enemy_ms: Some(SPACE_ENEMY_STEP_MS),
                projectile_ms: Some(SPACE_PROJECTILE_STEP_MS),
                spawn_ms: Some(SPACE_SPAWN_MS),
            },
            player: PlayerSettings {
                start: Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT - SHIP_BASELINE),
                health: PLAYER_START_HEALTH,
                heading: Direction::Up,
                speed: SHIP_SPEED,
                horizontal_only: true,
                body: Vec::new(),
                fire_direction: Some(Direction::Up),
            },
            waves: WaveConfig {
                initial_size: INITIAL_WAVE_SIZE,
                growth_base: WAVE_BASE,
                enemy_speed: ALIEN_SPEED,
                projectile_speed: LASER_SPEED,
                escape_damage: ESCAPE_DAMAGE,
                safe_distance: 0,
            },
            scoring: ScoreConfig {
                points_per_kill: POINTS_PER_KILL,
                level_bonus: LEVEL_BONUS,
            },
            pickups: 0,
            controls_bypass_lock: false,
        }
    }

    pub fn preset(id: GameId) -> Self {
        match id {
            GameId::Snake => Self::snake(),
            GameId::TopDownShooter => Self::top_down_shooter(),
            GameId::SpaceShooter => Self::space_shooter(),
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn has_self_collision(&self) -> bool {
        self.collision_rules
            .iter()
            .any(|r| matches!(r, CollisionRule::SelfCollision))
    }

    /// `(damage, proximity, consumes_enemy)` of the actor-contact rule, if any
    pub fn contact_rule(&self) -> Option<(u32, Proximity, bool)> {
        self.collision_rules.iter().find_map(|r| match *r {
            CollisionRule::ActorContact {
                damage,
                proximity,
                consumes_enemy,
            } => Some((damage, proximity, consumes_enemy)),
            _ => None,
        })
    }

    pub fn projectile_rule(&self) -> Option<Proximity> {
        self.collision_rules.iter().find_map(|r| match *r {
            CollisionRule::ProjectileHit { proximity } => Some(proximity),
            _ => None,
        })
    }

    /// Reject configs the engine cannot run
    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |msg: &str| Err(EngineError::InvalidConfig(msg.to_string()));

        if self.board.width() <= 0.0 || self.board.height() <= 0.0 {
            return invalid("board must have a positive size");
        }
        if self.clocks.clocks().iter().any(|(_, ms)| *ms == 0) {
            return invalid("clock intervals must be positive");
        }
        if !self.board.contains(self.player.start) {
            return invalid("player start lies outside the board");
        }
        if self.player.body.iter().any(|c| !self.board.contains(c.as_vec2())) {
            return invalid("player body lies outside the board");
        }

        let discrete = self.board.is_discrete();
        for rule in &self.collision_rules {
            let proximity = match *rule {
                CollisionRule::SelfCollision => {
                    if !discrete || self.player.body.is_empty() {
                        return invalid("self-collision needs a grid and a player body");
                    }
                    if self.movement == MovementModel::HeldKeySet {
                        return invalid("self-collision needs discrete-direction movement");
                    }
                    continue;
                }
                CollisionRule::ActorContact { proximity, .. } => proximity,
                CollisionRule::ProjectileHit { proximity } => {
                    if self.clocks.projectile_ms.is_none() {
                        return invalid("projectile hits need a projectile clock");
                    }
                    proximity
                }
            };
            let on_grid = !matches!(proximity, Proximity::Radius { .. });
            if on_grid != discrete {
                return invalid("proximity kind does not match the board");
            }
        }

        if self.has_levels && (self.waves.initial_size == 0 || self.clocks.enemy_ms.is_none()) {
            return invalid("levels need a non-empty first wave and an enemy clock");
        }
        if self.pickups > 0 && !discrete {
            return invalid("pickups are only placed on grids");
        }
        Ok(())
    }
}
