//! # Item Generation
//!
//! Scatters potions and gold piles over a freshly laid out level.

use crate::game::{ItemKind, Level, Position, Tile, TileType};
use crate::generation::GenerationConfig;
use crate::{RogueError, RogueResult};
use rand::rngs::StdRng;
use rand::Rng;

/// Places `items_per_level` items on free floor tiles.
#[derive(Debug, Clone, Default)]
pub struct ItemGenerator;

impl ItemGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Rolls a single item for the given depth.
    ///
    /// Gold piles hold between 1 and `5 * depth` coins.
    pub fn roll_item(&self, config: &GenerationConfig, depth: u32, rng: &mut StdRng) -> ItemKind {
        if rng.gen_bool(config.gold_chance.clamp(0.0, 1.0)) {
            ItemKind::Gold(rng.gen_range(1..=5 * depth.max(1)))
        } else {
            ItemKind::Potion
        }
    }

    /// Puts items on plain floor, never on the spawn.
    pub fn populate(&self, level: &mut Level, config: &GenerationConfig, rng: &mut StdRng) -> RogueResult<()> {
        let spawn = level.player_spawn;
        let mut candidates: Vec<Position> = level
            .floor_positions()
            .into_iter()
            .filter(|pos| *pos != spawn)
            .collect();

        for _ in 0..config.items_per_level {
            if candidates.is_empty() {
                return Err(RogueError::GenerationFailure {
                    depth: level.depth,
                    attempts: 1,
                    reason: "No floor left for items".to_string(),
                });
            }
            let pos = candidates.swap_remove(rng.gen_range(0..candidates.len()));
            let item = self.roll_item(config, level.depth, rng);
            level.set_tile(pos, Tile::new(TileType::Item(item)))?;
        }

        Ok(())
    }
}
