//! Fixed-interval simulation ticks
//!
//! [`Engine`] owns one game instance: session counters, entities, the input
//! resolver, its clocks and a seeded RNG. Hosts feed it raw input and elapsed
//! time (or fire clocks themselves) and read back snapshots and events. It
//! never touches presentation or storage.

use glam::{IVec2, Vec2};
use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{hits_body, resolve_contacts, resolve_projectile_hits};
use super::entity::{EntityKind, EntityStore};
use super::grid::{Board, Direction};
use super::input::{ControlCommand, InputEvent, InputResolver, MovementModel};
use super::scheduler::{ClockKind, Scheduler};
use super::state::{GameEvent, GameOverReason, GameSession};
use crate::config::GameConfig;
use crate::consts::SPAWN_MARGIN;
use crate::error::EngineError;
use crate::leaderboard::ScoreRecord;
use crate::snapshot::Snapshot;

/// One running game
#[derive(Debug, Clone)]
pub struct Engine {
    config: GameConfig,
    username: String,
    session: GameSession,
    store: EntityStore,
    input: InputResolver,
    scheduler: Scheduler,
    rng: Pcg32,
    events: Vec<GameEvent>,
    /// Best score across resets of this engine
    best_score: u64,
    /// Canvas enemies of the current wave not yet released
    pending_spawns: u32,
    /// Host time (ms) at which the current session started
    origin_ms: u64,
    record: Option<ScoreRecord>,
}

impl Engine {
    /// Validate `config` and start a fresh session
    pub fn new(
        config: GameConfig,
        username: impl Into<String>,
        seed: u64,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let mut engine = Self {
            session: GameSession::new(config.player.health),
            store: EntityStore::new(config.player.start),
            input: Self::make_input(&config),
            scheduler: Scheduler::new(&config.clocks.clocks()),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            best_score: 0,
            pending_spawns: 0,
            origin_ms: 0,
            record: None,
            username: username.into(),
            config,
        };
        engine.start_run();
        log::info!(
            "{} started for {} (seed {})",
            engine.config.game_id.as_str(),
            engine.username,
            seed
        );
        Ok(engine)
    }

    fn make_input(config: &GameConfig) -> InputResolver {
        InputResolver::new(
            config.movement,
            config.player.heading,
            config.controls_bypass_lock,
        )
    }

    /// Host wall-clock time of session start, used to stamp score records
    pub fn set_origin_ms(&mut self, origin_ms: u64) {
        self.origin_ms = origin_ms;
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Direct counter access for scripted setups and tests
    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Direct entity access for scripted setups and tests
    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    pub fn input(&self) -> &InputResolver {
        &self.input
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn pending_spawns(&self) -> u32 {
        self.pending_spawns
    }

    /// Record of the last finished run, until the next reset
    pub fn score_record(&self) -> Option<&ScoreRecord> {
        self.record.as_ref()
    }

    /// Take every event queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    // ------------------------------------------------------------------
    // Host entry points
    // ------------------------------------------------------------------

    /// Feed one raw input event
    pub fn handle_input(&mut self, event: InputEvent) {
        // Releases always go through so keys never stick across a pause
        let gameplay = !event.is_control() && !matches!(event, InputEvent::KeyUp(_));
        if gameplay && !self.session.lifecycle.is_running() {
            return;
        }

        let command = self.input.handle(event);
        self.session.input_mode = self.input.mode();
        match command {
            Some(ControlCommand::TogglePause) => self.toggle_pause(),
            Some(ControlCommand::Reset) => self.reset(),
            None => {}
        }
    }

    /// Running <-> Paused; ignored at GameOver
    pub fn toggle_pause(&mut self) {
        if !self.session.lifecycle.toggle_pause() {
            return;
        }
        if self.session.lifecycle.is_running() {
            self.scheduler.resume();
            self.events.push(GameEvent::Resumed);
            log::info!("Resumed");
        } else {
            self.scheduler.suspend();
            self.events.push(GameEvent::Paused);
            log::info!("Paused");
        }
    }

    /// Throw away the session, entities, clocks and input lock and start over
    pub fn reset(&mut self) {
        let seed = self.rng.next_u64();
        self.origin_ms += self.scheduler.now_ms();
        self.session = GameSession::new(self.config.player.health);
        self.store = EntityStore::new(self.config.player.start);
        self.input = Self::make_input(&self.config);
        self.scheduler = Scheduler::new(&self.config.clocks.clocks());
        self.rng = Pcg32::seed_from_u64(seed);
        self.pending_spawns = 0;
        self.record = None;
        self.events.push(GameEvent::Reset);
        log::info!("{} reset (best {})", self.config.game_id.as_str(), self.best_score);
        self.start_run();
    }

    /// Let `elapsed_ms` of host time pass and run every clock that came due
    pub fn advance(&mut self, elapsed_ms: u64) {
        self.scheduler.advance(elapsed_ms);
        while let Some(kind) = self.scheduler.pop_due() {
            self.on_clock(kind);
        }
    }

    /// Run one firing of `kind`. No-op unless Running.
    pub fn on_clock(&mut self, kind: ClockKind) {
        if !self.session.lifecycle.is_running() {
            return;
        }
        self.session.ticks += 1;
        match kind {
            ClockKind::Movement => self.step_player(),
            ClockKind::Enemy => self.step_enemies(),
            ClockKind::Projectile => self.step_projectiles(),
            ClockKind::Spawn => self.release_enemy(),
        }
        self.store.normalize_order();
    }

    // ------------------------------------------------------------------
    // Setup
    // ------------------------------------------------------------------

    fn start_run(&mut self) {
        self.store.player.heading = self.config.player.heading;
        self.store.segments = self.config.player.body.iter().copied().collect();
        if let Some(&head) = self.config.player.body.first() {
            self.store.player.set_cell(head);
        }
        for _ in 0..self.config.pickups {
            if let Err(err) = self.spawn_food() {
                log::warn!("Could not place food: {}", err);
                break;
            }
        }
        if self.config.has_levels {
            self.start_wave();
        }
    }

    fn spawn_food(&mut self) -> Result<(), EngineError> {
        let Board::Grid(grid) = self.config.board else {
            return Ok(());
        };
        let cell = grid.spawn_free_cell(&mut self.rng, &self.store.occupied_cells())?;
        self.store.spawn(EntityKind::Pickup, cell.as_vec2());
        Ok(())
    }

    fn start_wave(&mut self) {
        let level = self.session.level;
        let size = self.config.waves.size_for_level(level);

        match self.config.board {
            Board::Grid(grid) => {
                let player = self.store.player.cell();
                let safe = self.config.waves.safe_distance;
                let mut blocked = self.store.occupied_cells();
                blocked.extend(grid.cells().filter(|c| {
                    let d = (*c - player).abs();
                    d.x + d.y < safe
                }));

                let mut placed = 0;
                for _ in 0..size {
                    match grid.spawn_free_cell(&mut self.rng, &blocked) {
                        Ok(cell) => {
                            blocked.insert(cell);
                            self.store.spawn(EntityKind::Enemy, cell.as_vec2());
                            placed += 1;
                        }
                        Err(err) => {
                            log::warn!("Level {} wave cut short: {}", level, err);
                            break;
                        }
                    }
                }
                log::info!("Level {}: {} enemies on the grid", level, placed);
                self.events.push(GameEvent::WaveSpawned {
                    level,
                    size: placed,
                });
            }
            Board::Canvas(_) => {
                self.pending_spawns = size;
                if !self.config.clocks.has(ClockKind::Spawn) {
                    while self.pending_spawns > 0 {
                        self.release_enemy();
                    }
                }
                log::info!("Level {}: {} enemies queued", level, size);
                self.events.push(GameEvent::WaveSpawned { level, size });
            }
        }
    }

    /// Drop one queued enemy in at the top edge
    fn release_enemy(&mut self) {
        let Board::Canvas(canvas) = self.config.board else {
            return;
        };
        if self.pending_spawns == 0 {
            return;
        }
        self.pending_spawns -= 1;

        let margin = SPAWN_MARGIN.min(canvas.width / 2.0);
        let x = if canvas.width - margin > margin {
            self.rng.random_range(margin..canvas.width - margin)
        } else {
            canvas.width / 2.0
        };
        let speed = self.config.waves.enemy_speed;
        let enemy = self.store.spawn(EntityKind::Enemy, Vec2::new(x, 0.0));
        enemy.heading = Direction::Down;
        enemy.vel = Vec2::new(0.0, speed);
    }

    // ------------------------------------------------------------------
    // Clock steps
    // ------------------------------------------------------------------

    fn step_player(&mut self) {
        match self.config.movement {
            MovementModel::DiscreteDirection { .. } => {
                let dir = self.input.commit_direction();
                if dir == Direction::None {
                    return;
                }
                if self.store.segments.is_empty() {
                    self.store.player.heading = dir;
                    self.move_player_by(dir.delta());
                } else {
                    self.step_snake(dir);
                }
            }
            MovementModel::HeldKeySet => {
                let mut step = self.input.movement_vector();
                if self.config.player.horizontal_only {
                    step.y = 0;
                }
                let facing = self.input.current_direction();
                if facing != Direction::None {
                    self.store.player.heading = facing;
                }
                self.move_player_by(step);
            }
        }
    }

    fn move_player_by(&mut self, step: IVec2) {
        if step == IVec2::ZERO {
            return;
        }
        let speed = self.config.player.speed;
        let player = &mut self.store.player;
        match self.config.board {
            Board::Grid(grid) => {
                let cell = grid.advance_by(player.cell(), step);
                player.set_cell(cell);
            }
            Board::Canvas(canvas) => {
                player.pos = canvas.apply_boundary(player.pos + step.as_vec2() * speed);
            }
        }
    }

    fn step_snake(&mut self, dir: Direction) {
        let Board::Grid(grid) = self.config.board else {
            return;
        };
        let Some(&head) = self.store.segments.front() else {
            return;
        };
        let next = grid.advance(head, dir);

        // Checked against the whole body, tail included, before it moves
        if self.config.has_self_collision() && hits_body(next, &self.store.segments) {
            self.game_over(GameOverReason::SelfCollision);
            return;
        }

        self.store.segments.push_front(next);
        self.store.player.set_cell(next);
        self.store.player.heading = dir;

        let food = self
            .store
            .pickups
            .iter()
            .find(|p| p.cell() == next)
            .map(|p| p.id);
        match food {
            Some(id) => {
                self.store.remove(EntityKind::Pickup, id);
                self.award(self.config.scoring.points_per_kill);
                self.events.push(GameEvent::FoodEaten {
                    score: self.session.score,
                });
                if let Err(err) = self.spawn_food() {
                    log::info!("Snake filled the board: {}", err);
                    self.game_over(GameOverReason::BoardFilled);
                }
            }
            None => {
                self.store.segments.pop_back();
            }
        }
    }

    fn step_enemies(&mut self) {
        match self.config.board {
            Board::Grid(grid) => {
                let target = self.store.player.cell();
                for enemy in &mut self.store.enemies {
                    let delta = target - enemy.cell();
                    let step = if delta.x.abs() >= delta.y.abs() {
                        IVec2::new(delta.x.signum(), 0)
                    } else {
                        IVec2::new(0, delta.y.signum())
                    };
                    enemy.heading = Direction::from_delta(step);
                    let cell = grid.advance_by(enemy.cell(), step);
                    enemy.set_cell(cell);
                }
            }
            Board::Canvas(canvas) => {
                for enemy in &mut self.store.enemies {
                    enemy.pos += enemy.vel;
                    if canvas.wrap {
                        enemy.pos = canvas.apply_boundary(enemy.pos);
                    }
                }
                let (inside, escaped): (Vec<_>, Vec<_>) = std::mem::take(&mut self.store.enemies)
                    .into_iter()
                    .partition(|e| canvas.contains(e.pos));
                self.store.enemies = inside;
                for enemy in escaped {
                    self.events.push(GameEvent::EnemyEscaped { enemy: enemy.id });
                    let before = self.session.health;
                    self.session.health = before.saturating_sub(self.config.waves.escape_damage);
                    if self.report_damage(before - self.session.health) {
                        return;
                    }
                }
            }
        }

        if let Some((damage, proximity, consumes)) = self.config.contact_rule() {
            let outcome = resolve_contacts(
                self.store.player.pos,
                &mut self.session.health,
                &self.store.enemies,
                proximity,
                damage,
            );
            if consumes {
                for &enemy in &outcome.enemies {
                    self.store.remove(EntityKind::Enemy, enemy);
                    self.events.push(GameEvent::EnemyCrashed { enemy });
                }
            }
            if !outcome.enemies.is_empty() && self.report_damage(outcome.damage) {
                return;
            }
        }
        self.check_wave_cleared();
    }

    fn step_projectiles(&mut self) {
        if self.input.trigger_action() {
            self.fire();
        }

        let board = self.config.board;
        for shot in &mut self.store.projectiles {
            match board {
                Board::Grid(_) => {
                    let cell = shot.cell() + shot.heading.delta();
                    shot.set_cell(cell);
                }
                Board::Canvas(_) => shot.pos += shot.vel,
            }
        }
        // Projectiles never wrap or clamp: leaving the board destroys them
        self.store.projectiles.retain(|p| board.contains(p.pos));

        let Some(proximity) = self.config.projectile_rule() else {
            return;
        };
        let hits = resolve_projectile_hits(
            &mut self.store.projectiles,
            &mut self.store.enemies,
            proximity,
        );
        for hit in &hits {
            self.award(self.config.scoring.points_per_kill);
            self.events.push(GameEvent::EnemyDestroyed {
                enemy: hit.enemy,
                projectile: hit.projectile,
                at: hit.at,
            });
        }
        if !hits.is_empty() {
            log::debug!("{} enemies destroyed, score {}", hits.len(), self.session.score);
        }
        self.check_wave_cleared();
    }

    fn fire(&mut self) {
        let heading = match self.config.player.fire_direction {
            Some(dir) => dir,
            None if self.store.player.heading == Direction::None => Direction::Up,
            None => self.store.player.heading,
        };
        let origin = self.store.player.pos;
        let speed = self.config.waves.projectile_speed;
        let shot = self.store.spawn(EntityKind::Projectile, origin);
        shot.heading = heading;
        shot.vel = heading.delta().as_vec2() * speed;
    }

    // ------------------------------------------------------------------
    // Score and lifecycle
    // ------------------------------------------------------------------

    fn check_wave_cleared(&mut self) {
        if !self.config.has_levels || !self.session.lifecycle.is_running() {
            return;
        }
        if !self.store.enemies.is_empty() || self.pending_spawns > 0 {
            return;
        }
        let level = self.session.level;
        let bonus = self.config.scoring.level_bonus(level);
        self.award(bonus);
        self.events.push(GameEvent::LevelCompleted { level, bonus });
        log::info!("Level {} cleared, bonus {}", level, bonus);
        self.session.level += 1;
        self.start_wave();
    }

    fn award(&mut self, points: u64) {
        self.session.add_score(points);
        self.best_score = self.best_score.max(self.session.score);
    }

    /// Announce that the player lost `damage`; true when the run ended
    fn report_damage(&mut self, damage: u32) -> bool {
        let health = self.session.health;
        if damage > 0 {
            self.events.push(GameEvent::PlayerHit { damage, health });
        }
        if health == 0 {
            self.game_over(GameOverReason::Defeated);
            return true;
        }
        false
    }

    fn game_over(&mut self, reason: GameOverReason) {
        if !self.session.lifecycle.end() {
            return;
        }
        self.scheduler.suspend();
        self.best_score = self.best_score.max(self.session.score);
        let record = ScoreRecord::new(
            &self.username,
            self.session.score,
            self.config.game_id,
            self.origin_ms + self.scheduler.now_ms(),
        );
        log::info!(
            "Game over ({:?}): {} scored {} at level {}",
            reason,
            self.username,
            self.session.score,
            self.session.level
        );
        self.record = Some(record.clone());
        self.events.push(GameEvent::GameOver { reason, record });
    }
}
