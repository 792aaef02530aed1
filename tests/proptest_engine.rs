//! Property tests for the engine.
//!
//! Random sequences of input events, elapsed time and direct clock firings
//! are replayed against every preset, and the engine invariants are checked
//! after each step.

use arcade_engine::sim::collision::resolve_projectile_hits;
use arcade_engine::sim::{
    ClockKind, Direction, Entity, EntityKind, GameEvent, InputEvent, Key, Lifecycle, Proximity,
    TouchButton,
};
use arcade_engine::{Engine, GameConfig, GameId};
use glam::Vec2;
use proptest::prelude::*;

/// Operations a host can perform on an engine.
#[derive(Debug, Clone)]
enum Op {
    KeyDown(Key),
    KeyUp(Key),
    Touch(TouchButton),
    Advance(u64),
    Clock(ClockKind),
}

fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![
        8 => prop_oneof![Just(Key::Up), Just(Key::Down), Just(Key::Left), Just(Key::Right)],
        3 => Just(Key::Fire),
        1 => Just(Key::Pause),
        1 => Just(Key::Reset),
    ]
}

fn touch_strategy() -> impl Strategy<Value = TouchButton> {
    prop_oneof![
        Just(TouchButton::Up),
        Just(TouchButton::Down),
        Just(TouchButton::Left),
        Just(TouchButton::Right),
        Just(TouchButton::Fire),
    ]
}

fn clock_strategy() -> impl Strategy<Value = ClockKind> {
    prop_oneof![
        Just(ClockKind::Movement),
        Just(ClockKind::Enemy),
        Just(ClockKind::Projectile),
        Just(ClockKind::Spawn),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => key_strategy().prop_map(Op::KeyDown),
        2 => key_strategy().prop_map(Op::KeyUp),
        1 => touch_strategy().prop_map(Op::Touch),
        4 => (0u64..600).prop_map(Op::Advance),
        4 => clock_strategy().prop_map(Op::Clock),
    ]
}

fn game_strategy() -> impl Strategy<Value = GameId> {
    prop_oneof![
        Just(GameId::Snake),
        Just(GameId::TopDownShooter),
        Just(GameId::SpaceShooter),
    ]
}

fn apply(engine: &mut Engine, op: &Op) {
    match *op {
        Op::KeyDown(key) => engine.handle_input(InputEvent::KeyDown(key)),
        Op::KeyUp(key) => engine.handle_input(InputEvent::KeyUp(key)),
        Op::Touch(button) => engine.handle_input(InputEvent::Touch(button)),
        Op::Advance(ms) => engine.advance(ms),
        Op::Clock(kind) => engine.on_clock(kind),
    }
}

fn assert_in_bounds(engine: &Engine) -> Result<(), TestCaseError> {
    let board = engine.config().board;
    for entity in engine.store().iter() {
        prop_assert!(
            board.contains(entity.pos),
            "{:?} {} out of bounds at {:?}",
            entity.kind,
            entity.id,
            entity.pos
        );
    }
    for cell in &engine.store().segments {
        prop_assert!(board.contains(cell.as_vec2()), "segment out of bounds at {:?}", cell);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn entities_stay_on_the_board(
        game in game_strategy(),
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 1..80),
    ) {
        let mut engine = Engine::new(GameConfig::preset(game), "prop", seed).unwrap();
        assert_in_bounds(&engine)?;
        for op in &ops {
            apply(&mut engine, op);
            assert_in_bounds(&engine)?;
        }
    }

    #[test]
    fn score_only_drops_on_reset(
        game in game_strategy(),
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 1..80),
    ) {
        let mut engine = Engine::new(GameConfig::preset(game), "prop", seed).unwrap();
        let mut score = engine.session().score;
        for op in &ops {
            apply(&mut engine, op);
            let reset = engine.drain_events().contains(&GameEvent::Reset);
            let now = engine.session().score;
            if reset {
                prop_assert_eq!(now, 0);
            } else {
                prop_assert!(now >= score, "score fell from {} to {}", score, now);
            }
            prop_assert!(engine.best_score() >= now);
            score = now;
        }
    }

    #[test]
    fn nothing_ticks_unless_running(
        game in game_strategy(),
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 1..80),
    ) {
        let mut engine = Engine::new(GameConfig::preset(game), "prop", seed).unwrap();
        for op in &ops {
            let before = engine.snapshot();
            let was_running = before.session.lifecycle == Lifecycle::Running;
            apply(&mut engine, op);
            if !was_running && matches!(op, Op::Advance(_) | Op::Clock(_)) {
                prop_assert_eq!(engine.snapshot(), before);
            }
        }
    }

    #[test]
    fn lifecycle_transitions_are_legal(
        game in game_strategy(),
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 1..80),
    ) {
        let mut engine = Engine::new(GameConfig::preset(game), "prop", seed).unwrap();
        for op in &ops {
            let before = engine.session().lifecycle;
            apply(&mut engine, op);
            let after = engine.session().lifecycle;
            let reset = engine.drain_events().contains(&GameEvent::Reset);
            if before == after || reset {
                continue;
            }
            match after {
                Lifecycle::GameOver | Lifecycle::Paused => prop_assert_eq!(before, Lifecycle::Running),
                Lifecycle::Running => prop_assert_eq!(before, Lifecycle::Paused),
            }
        }
    }

    #[test]
    fn snake_never_reverses(
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 1..120),
    ) {
        let mut engine = Engine::new(GameConfig::snake(), "prop", seed).unwrap();
        for op in &ops {
            let heading = engine.store().player.heading;
            let head = engine.store().segments.front().copied();
            apply(&mut engine, op);
            if engine.drain_events().contains(&GameEvent::Reset) {
                continue;
            }
            let new_heading = engine.store().player.heading;
            prop_assert!(
                !new_heading.is_opposite(heading),
                "reversed {:?} -> {:?}",
                heading,
                new_heading
            );
            // The head never moves back onto the neck
            let body = &engine.store().segments;
            if let (Some(old), Some(neck)) = (head, body.get(2)) {
                if body[1] == old {
                    prop_assert_ne!(body[0], *neck);
                }
            }
        }
    }

    #[test]
    fn projectile_hits_are_one_for_one(
        shots in prop::collection::vec((0i32..8, 0i32..8), 0..12),
        targets in prop::collection::vec((0i32..8, 0i32..8), 0..12),
        adjacent in any::<bool>(),
    ) {
        let mut id = 0;
        let mut make = |kind, (x, y): (i32, i32)| {
            id += 1;
            Entity::new(id, kind, Vec2::new(x as f32, y as f32))
        };
        let mut projectiles: Vec<Entity> =
            shots.iter().map(|&p| make(EntityKind::Projectile, p)).collect();
        let mut enemies: Vec<Entity> =
            targets.iter().map(|&p| make(EntityKind::Enemy, p)).collect();
        let proximity = if adjacent { Proximity::Adjacent } else { Proximity::SameCell };

        let hits = resolve_projectile_hits(&mut projectiles, &mut enemies, proximity);

        let removed_shots = shots.len() - projectiles.len();
        let removed_enemies = targets.len() - enemies.len();
        prop_assert_eq!(removed_shots, hits.len());
        prop_assert_eq!(removed_enemies, hits.len());
        prop_assert!(hits.len() <= shots.len().min(targets.len()));

        // No survivor pair is still touching
        for p in &projectiles {
            for e in &enemies {
                prop_assert!(!proximity.touches(p.pos, e.pos));
            }
        }
    }

    #[test]
    fn same_seed_same_run(
        game in game_strategy(),
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 1..60),
    ) {
        let mut a = Engine::new(GameConfig::preset(game), "prop", seed).unwrap();
        let mut b = Engine::new(GameConfig::preset(game), "prop", seed).unwrap();
        for op in &ops {
            apply(&mut a, op);
            apply(&mut b, op);
        }
        prop_assert_eq!(a.snapshot(), b.snapshot());
        prop_assert_eq!(a.drain_events(), b.drain_events());
    }
}

#[test]
fn directions_have_unit_steps() {
    for dir in Direction::ALL {
        let d = dir.delta();
        assert_eq!(d.x.abs() + d.y.abs(), 1);
        assert_eq!(dir.opposite().delta(), -d);
    }
}
