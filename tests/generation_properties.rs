//! Property tests for level generation, combat and the tick loop.

use delverogue::generation::utils::create_rng;
use delverogue::{
    ActionKind, Damageable, Direction, Engine, EngineConfig, GenerationConfig, Generator, Monster,
    MonsterId, MonsterKind, Player, Position, RoomCorridorGenerator, TileType,
};
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generated_levels_are_connected_with_one_exit(seed in any::<u64>(), depth in 1u32..7) {
        let config = GenerationConfig::new();
        let level = RoomCorridorGenerator::new()
            .generate(&config, depth, &mut create_rng(seed))
            .unwrap();

        prop_assert_eq!(level.exit_count(), 1);
        prop_assert!(level.is_fully_connected());

        let reachable = level.reachable_from(level.player_spawn);
        for pos in level.floor_positions() {
            prop_assert!(reachable.contains(&pos), "{} unreachable", pos);
        }

        prop_assert_eq!(level.tile_type(level.player_spawn), Some(TileType::Floor));
        prop_assert_eq!(level.monsters.len() as u32, config.monster_count(depth));
        for monster in &level.monsters {
            prop_assert!(monster.position.manhattan_distance(level.player_spawn) > config.spawn_safe_radius);
            prop_assert!(monster.kind.min_depth() <= depth);
        }
    }

    #[test]
    fn generation_is_deterministic(seed in any::<u64>(), depth in 1u32..7) {
        let config = GenerationConfig::new();
        let generator = RoomCorridorGenerator::new();
        let a = generator.generate(&config, depth, &mut create_rng(seed)).unwrap();
        let b = generator.generate(&config, depth, &mut create_rng(seed)).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn combat_floors_hit_points_at_zero(hp in 1u32..50, damage in 0u32..80) {
        let mut monster = Monster::new(MonsterId(0), MonsterKind::Zombie, Position::new(1, 1), 1, 0);
        monster.hp = hp;
        monster.max_hp = hp;
        monster.take_damage(damage);
        prop_assert_eq!(monster.hp, hp.saturating_sub(damage));
        prop_assert_eq!(monster.is_dead(), damage >= hp);
    }

    #[test]
    fn random_play_keeps_invariants(seed in any::<u64>(), actions in prop::collection::vec(0usize..5, 1..120)) {
        // check_invariants is on in the testing config, so any dangling
        // occupant reference surfaces as an error from step
        let mut engine = Engine::with_config(Player::new(), seed, true, EngineConfig::for_testing()).unwrap();
        let mut depth = engine.depth();
        let mut explored: HashSet<Position> = HashSet::new();

        for action in actions {
            let result = engine.step_index(action).unwrap();
            prop_assert_eq!(result.invalid_action, action >= 4);
            if result.invalid_action {
                prop_assert_eq!(result.action, ActionKind::Blocked);
            }

            if engine.depth() != depth {
                depth = engine.depth();
                explored.clear();
            }
            let level = engine.level();
            let now: HashSet<Position> = level
                .positions()
                .filter(|pos| level.get_tile(*pos).map(|tile| tile.explored).unwrap_or(false))
                .collect();
            prop_assert!(explored.is_subset(&now));
            explored = now;

            for monster in &level.monsters {
                prop_assert!(monster.is_alive());
            }
            if result.is_terminal() {
                break;
            }
        }
    }

    #[test]
    fn acknowledged_exploration_matches_flags(seed in any::<u64>(), moves in prop::collection::vec(0usize..4, 1..40)) {
        let mut engine = Engine::with_config(Player::new(), seed, true, EngineConfig::for_testing()).unwrap();
        let mut total = engine.acknowledge_explored();

        for action in moves {
            let result = engine.step_index(action).unwrap();
            if result.depth != 1 || result.is_terminal() {
                return Ok(());
            }
            prop_assert_eq!(result.newly_explored, engine.newly_explored_count());
            total += engine.acknowledge_explored();
        }

        let level = engine.level();
        let flagged = level
            .positions()
            .filter(|pos| level.get_tile(*pos).map(|tile| tile.already_explored).unwrap_or(false))
            .count() as u32;
        prop_assert_eq!(total, flagged);
    }
}

#[test]
fn test_resolver_covers_every_direction() {
    let engine = Engine::new(Player::new(), 7, true).unwrap();
    for direction in Direction::all() {
        let mut copy = engine.clone();
        let result = copy.step(direction).unwrap();
        assert_eq!(result.destination, Some(engine.player().position.step(direction)));
    }
}
