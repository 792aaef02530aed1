//! Arcade Engine headless runner
//!
//! Plays one preset with a simple autopilot, logging events as they happen,
//! then prints the final snapshot and score record as JSON.
//!
//! Usage: `arcade-engine [snake|shooter|space] [seed] [duration_ms]`
//! (`--help` for details)

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use arcade_engine::sim::{Direction, Engine, InputEvent, Key};
    use arcade_engine::GameId;
    use glam::Vec2;

    fn key_for(dir: Direction) -> Option<Key> {
        match dir {
            Direction::Up => Some(Key::Up),
            Direction::Down => Some(Key::Down),
            Direction::Left => Some(Key::Left),
            Direction::Right => Some(Key::Right),
            Direction::None => None,
        }
    }

    fn nearest(from: Vec2, targets: impl Iterator<Item = Vec2>) -> Option<Vec2> {
        targets.min_by(|a, b| from.distance_squared(*a).total_cmp(&from.distance_squared(*b)))
    }

    /// Feed one frame worth of input
    pub fn steer(engine: &mut Engine) {
        let store = engine.store();
        let me = store.player.pos;
        match engine.config().game_id {
            GameId::Snake => {
                let Some(food) = nearest(me, store.pickups.iter().map(|p| p.pos)) else {
                    return;
                };
                let dir = Direction::from_delta((food - me).round().as_ivec2());
                if let Some(key) = key_for(dir) {
                    engine.handle_input(InputEvent::KeyDown(key));
                }
            }
            GameId::TopDownShooter => {
                let Some(target) = nearest(me, store.enemies.iter().map(|e| e.pos)) else {
                    return;
                };
                let dir = Direction::from_delta((target - me).round().as_ivec2());
                for other in Direction::ALL {
                    if let (true, Some(key)) = (other != dir, key_for(other)) {
                        engine.handle_input(InputEvent::KeyUp(key));
                    }
                }
                if let Some(key) = key_for(dir) {
                    engine.handle_input(InputEvent::KeyDown(key));
                }
                engine.handle_input(InputEvent::KeyDown(Key::Fire));
            }
            GameId::SpaceShooter => {
                let target = nearest(me, store.enemies.iter().map(|e| e.pos));
                let dx = target.map_or(0.0, |t| t.x - me.x);
                let (press, release) = if dx < -4.0 {
                    (Some(Key::Left), Key::Right)
                } else if dx > 4.0 {
                    (Some(Key::Right), Key::Left)
                } else {
                    (None, Key::Left)
                };
                engine.handle_input(InputEvent::KeyUp(release));
                match press {
                    Some(key) => engine.handle_input(InputEvent::KeyDown(key)),
                    None => engine.handle_input(InputEvent::KeyUp(Key::Right)),
                }
                if target.is_some() {
                    engine.handle_input(InputEvent::KeyDown(Key::Fire));
                }
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use arcade_engine::GameId;
    use clap::Parser;

    fn parse_game(s: &str) -> Result<GameId, String> {
        GameId::from_str(s)
            .ok_or_else(|| format!("unknown game '{}' (expected snake, shooter or space)", s))
    }

    /// Play one preset headless with the autopilot
    #[derive(Debug, Parser)]
    #[command(name = "arcade-engine", version)]
    pub struct Args {
        /// snake, shooter or space
        #[arg(value_parser = parse_game, default_value = "snake")]
        pub game: GameId,
        /// RNG seed
        #[arg(default_value_t = 0xC0FFEE)]
        pub seed: u64,
        /// Simulated time to play before stopping
        #[arg(default_value_t = 60_000)]
        pub duration_ms: u64,
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let args = Args::try_parse_from(["arcade-engine"]).unwrap();
            assert_eq!(args.game, GameId::Snake);
            assert_eq!(args.seed, 0xC0FFEE);
            assert_eq!(args.duration_ms, 60_000);
        }

        #[test]
        fn test_positional_values() {
            let args = Args::try_parse_from(["arcade-engine", "space", "7", "300"]).unwrap();
            assert_eq!(args.game, GameId::SpaceShooter);
            assert_eq!(args.seed, 7);
            assert_eq!(args.duration_ms, 300);
        }

        #[test]
        fn test_bad_seed_is_a_usage_error() {
            assert!(Args::try_parse_from(["arcade-engine", "snake", "notanumber", "300"]).is_err());
        }

        #[test]
        fn test_unknown_game_is_rejected() {
            assert!(Args::try_parse_from(["arcade-engine", "pong"]).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use arcade_engine::sim::GameEvent;
    use arcade_engine::{Engine, GameConfig, Leaderboard};
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli::Args {
        game: game_id,
        seed,
        duration_ms,
    } = cli::Args::parse();

    log::info!("Arcade Engine (native) starting {}...", game_id.as_str());

    let mut engine = match Engine::new(GameConfig::preset(game_id), "autopilot", seed) {
        Ok(engine) => engine,
        Err(err) => {
            log::error!("Failed to start: {}", err);
            std::process::exit(1);
        }
    };
    let origin_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    engine.set_origin_ms(origin_ms);

    let frame_ms = 16;
    let mut elapsed = 0;
    while elapsed < duration_ms && engine.session().lifecycle.is_running() {
        autopilot::steer(&mut engine);
        engine.advance(frame_ms);
        elapsed += frame_ms;

        for event in engine.drain_events() {
            match event {
                GameEvent::FoodEaten { .. } | GameEvent::EnemyDestroyed { .. } => {
                    log::debug!("{:?}", event)
                }
                _ => log::info!("{:?}", event),
            }
        }
    }

    match engine.snapshot().to_json() {
        Ok(json) => println!("{}", json),
        Err(err) => log::error!("Snapshot encoding failed: {}", err),
    }

    let mut leaderboard = Leaderboard::new();
    match engine.score_record() {
        Some(record) => {
            if let Ok(json) = serde_json::to_string(record) {
                println!("{}", json);
            }
            match leaderboard.add(record.clone()) {
                Some(rank) => log::info!("{} takes leaderboard rank #{}", engine.username(), rank),
                None => log::info!(
                    "{}'s score {} did not make the leaderboard",
                    engine.username(),
                    record.score
                ),
            }
        }
        None => log::info!(
            "Still running after {} ms, score {} (best {})",
            elapsed,
            engine.session().score,
            engine.best_score()
        ),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts drive the library directly; nothing to do here
}
