//! # Encounter Generation
//!
//! Depth-scaled monster spawns.

use crate::game::{Level, Monster, MonsterId, MonsterKind, Position, TileType};
use crate::generation::GenerationConfig;
use crate::{RogueError, RogueResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Spawns `monster_count(depth)` monsters away from the player's spawn.
#[derive(Debug, Clone, Default)]
pub struct EncounterGenerator;

impl EncounterGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Plain, unoccupied floor outside the safe radius around the spawn.
    fn spawn_candidates(&self, level: &Level, config: &GenerationConfig) -> Vec<Position> {
        let spawn = level.player_spawn;
        level
            .positions_where(|tile_type| tile_type == TileType::Floor)
            .into_iter()
            .filter(|pos| pos.manhattan_distance(spawn) > config.spawn_safe_radius)
            .filter(|pos| level.occupant(*pos).is_none())
            .collect()
    }

    /// Adds monsters to the level. Ids follow spawn order.
    ///
    /// Fails when the level has too little room for the required count
    /// rather than spawning fewer.
    pub fn populate(&self, level: &mut Level, config: &GenerationConfig, rng: &mut StdRng) -> RogueResult<()> {
        let depth = level.depth;
        let count = config.monster_count(depth) as usize;
        let mut candidates = self.spawn_candidates(level, config);

        if candidates.len() < count {
            return Err(RogueError::GenerationFailure {
                depth,
                attempts: 1,
                reason: format!(
                    "Room for {} monsters, {} required",
                    candidates.len(),
                    count
                ),
            });
        }

        candidates.shuffle(rng);
        let kinds = MonsterKind::available_at(depth);

        for (index, pos) in candidates.into_iter().take(count).enumerate() {
            let kind = kinds[rng.gen_range(0..kinds.len())];
            let bounty = rng.gen_range(1..=2 * depth.max(1));
            level.add_monster(Monster::new(MonsterId(index as u32), kind, pos, depth, bounty))?;
        }

        Ok(())
    }
}
