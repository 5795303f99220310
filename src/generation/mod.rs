//! # Generation Module
//!
//! Procedural content generation for dungeon levels.
//!
//! A level is built in three passes: room-and-corridor layout, item scattering
//! and monster encounters. Every pass draws from the same seeded RNG, so a
//! given `(depth, rng state, config)` always yields the same level.

pub mod dungeon;
pub mod encounters;
pub mod items;

pub use dungeon::*;
pub use encounters::*;
pub use items::*;

use crate::config;
use crate::game::{Level, Position, TileType};
use crate::{RogueError, RogueResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Configuration for procedural generation.
///
/// Controls the grid size, the room layout and how densely items and
/// monsters are placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Level width in tiles
    pub width: u32,
    /// Level height in tiles
    pub height: u32,
    /// Minimum room size, walls included
    pub min_room_size: u32,
    /// Maximum room size, walls included
    pub max_room_size: u32,
    /// Minimum number of rooms per level. Never below two
    pub min_rooms: u32,
    /// Maximum number of rooms per level
    pub max_rooms: u32,
    /// Candidate positions tried per room before skipping it
    pub max_placement_attempts: u32,
    /// Whole-level attempts before reporting a generation failure
    pub max_generation_attempts: u32,
    /// Items scattered per level
    pub items_per_level: u32,
    /// Probability that an item is gold instead of a potion (0.0 to 1.0)
    pub gold_chance: f64,
    /// Monsters on the first level
    pub base_monsters: u32,
    /// Levels per additional monster
    pub depth_step: u32,
    /// Upper bound on monsters per level
    pub max_monsters: u32,
    /// Manhattan distance around the spawn kept free of monsters
    pub spawn_safe_radius: u32,
}

impl GenerationConfig {
    /// Creates a default generation configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use delverogue::GenerationConfig;
    ///
    /// let config = GenerationConfig::new();
    /// assert_eq!(config.width, 15);
    /// assert_eq!(config.height, 18);
    /// assert!(config.max_room_size >= config.min_room_size);
    /// ```
    pub fn new() -> Self {
        Self {
            width: config::DEFAULT_LEVEL_WIDTH,
            height: config::DEFAULT_LEVEL_HEIGHT,
            min_room_size: 5,
            max_room_size: 7,
            min_rooms: 2,
            max_rooms: 4,
            max_placement_attempts: 100,
            max_generation_attempts: config::DEFAULT_MAX_GENERATION_ATTEMPTS,
            items_per_level: 2,
            gold_chance: 0.5,
            base_monsters: 1,
            depth_step: 2,
            max_monsters: 6,
            spawn_safe_radius: 3,
        }
    }

    /// Creates a configuration for testing with a larger grid and a light
    /// monster load, so generation practically never needs a retry.
    pub fn for_testing() -> Self {
        Self {
            width: 30,
            height: 24,
            min_rooms: 3,
            max_monsters: 3,
            ..Self::new()
        }
    }

    /// Number of monsters spawned at `depth`.
    ///
    /// Grows by one every `depth_step` levels and never exceeds
    /// `max_monsters`, so it is non-decreasing in depth.
    ///
    /// # Examples
    ///
    /// ```
    /// use delverogue::GenerationConfig;
    ///
    /// let config = GenerationConfig::new();
    /// assert_eq!(config.monster_count(1), 1);
    /// assert_eq!(config.monster_count(3), 2);
    /// assert_eq!(config.monster_count(100), config.max_monsters);
    /// ```
    pub fn monster_count(&self, depth: u32) -> u32 {
        let step = self.depth_step.max(1);
        let grown = self.base_monsters + depth.saturating_sub(1) / step;
        grown.min(self.max_monsters)
    }

    /// Checks that rooms of the configured sizes can fit on the grid.
    pub fn validate(&self) -> RogueResult<()> {
        if self.min_room_size < 3 || self.min_room_size > self.max_room_size {
            return Err(RogueError::InvalidState(format!(
                "Invalid room size range {}..={}",
                self.min_room_size, self.max_room_size
            )));
        }
        if self.max_room_size + 3 > self.width || self.max_room_size + 3 > self.height {
            return Err(RogueError::InvalidState(format!(
                "Rooms up to {} tiles do not fit a {}x{} level",
                self.max_room_size, self.width, self.height
            )));
        }
        if self.min_rooms.max(2) > self.max_rooms {
            return Err(RogueError::InvalidState(format!(
                "Invalid room count range {}..={}",
                self.min_rooms, self.max_rooms
            )));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Represents a rectangular room in the dungeon.
///
/// The rectangle includes the surrounding walls; only the interior is carved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Index of this room in placement order
    pub id: u32,
    /// Top-left corner of the room
    pub top_left: Position,
    /// Width of the room (including walls)
    pub width: u32,
    /// Height of the room (including walls)
    pub height: u32,
}

impl Room {
    /// Creates a new room with the given parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use delverogue::{Position, Room};
    ///
    /// let room = Room::new(1, Position::new(5, 5), 10, 8);
    /// assert_eq!(room.id, 1);
    /// assert_eq!(room.width, 10);
    /// assert_eq!(room.height, 8);
    /// ```
    pub fn new(id: u32, top_left: Position, width: u32, height: u32) -> Self {
        Self {
            id,
            top_left,
            width,
            height,
        }
    }

    /// Gets the center position of the room.
    pub fn center(&self) -> Position {
        Position::new(
            self.top_left.x + self.width as i32 / 2,
            self.top_left.y + self.height as i32 / 2,
        )
    }

    /// Checks if this room overlaps with another room.
    pub fn overlaps(&self, other: &Room) -> bool {
        !(self.top_left.x >= other.top_left.x + other.width as i32
            || other.top_left.x >= self.top_left.x + self.width as i32
            || self.top_left.y >= other.top_left.y + other.height as i32
            || other.top_left.y >= self.top_left.y + self.height as i32)
    }

    /// Gets all floor positions within this room.
    pub fn floor_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();

        for y in (self.top_left.y + 1)..(self.top_left.y + self.height as i32 - 1) {
            for x in (self.top_left.x + 1)..(self.top_left.x + self.width as i32 - 1) {
                positions.push(Position::new(x, y));
            }
        }

        positions
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content for `depth` using the provided configuration and
    /// random number generator.
    fn generate(&self, config: &GenerationConfig, depth: u32, rng: &mut StdRng) -> RogueResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> RogueResult<()>;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    /// Creates a seeded random number generator.
    pub fn create_rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    /// A seed derived from the wall clock.
    pub fn time_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or(0)
    }

    /// Picks the seed the RNG is actually built from.
    ///
    /// # Examples
    ///
    /// ```
    /// use delverogue::generation::utils::resolve_seed;
    ///
    /// assert_eq!(resolve_seed(12345, true), 12345);
    /// ```
    pub fn resolve_seed(seed: u64, fixed_seed: bool) -> u64 {
        if fixed_seed {
            seed
        } else {
            time_seed()
        }
    }

    /// Validates that a level meets the structural requirements: a walkable
    /// spawn, exactly one exit, and every passable tile reachable.
    pub fn validate_level(level: &Level) -> RogueResult<()> {
        let reject = |reason: String| RogueError::GenerationFailure {
            depth: level.depth,
            attempts: 1,
            reason,
        };

        if level.floor_positions().is_empty() {
            return Err(reject("Level has no floor tiles".to_string()));
        }

        if level.tile_type(level.player_spawn) != Some(TileType::Floor) {
            return Err(reject(format!("Spawn {} is not floor", level.player_spawn)));
        }

        let exits = level.exit_count();
        if exits != 1 {
            return Err(reject(format!("Expected exactly one exit, found {}", exits)));
        }
        match level.exit_position {
            Some(exit) if level.tile_type(exit) == Some(TileType::Exit) => {}
            _ => return Err(reject("Exit position does not hold the exit".to_string())),
        }

        if !level.is_fully_connected() {
            return Err(reject("Not every tile is reachable from the spawn".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generation_config_creation() {
        let config = GenerationConfig::new();
        assert!(config.min_room_size >= 3);
        assert!(config.max_room_size >= config.min_room_size);
        assert!(config.min_rooms <= config.max_rooms);
        assert!(config.validate().is_ok());
        assert!(GenerationConfig::for_testing().validate().is_ok());
    }

    #[test]
    fn test_config_rejects_oversized_rooms() {
        let config = GenerationConfig {
            max_room_size: 20,
            ..GenerationConfig::new()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_monster_count_is_monotonic() {
        let config = GenerationConfig::new();
        let counts: Vec<u32> = (1..40).map(|depth| config.monster_count(depth)).collect();
        assert!(counts.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(*counts.last().unwrap(), config.max_monsters);
    }

    #[test]
    fn test_room_geometry() {
        let room = Room::new(1, Position::new(5, 5), 10, 8);

        assert_eq!(room.center(), Position::new(10, 9));
        assert_eq!(room.floor_positions().len(), 48);
    }

    #[test]
    fn test_room_overlap() {
        let room1 = Room::new(1, Position::new(5, 5), 10, 8);
        let room2 = Room::new(2, Position::new(10, 8), 6, 6);
        let room3 = Room::new(3, Position::new(20, 20), 5, 5);

        assert!(room1.overlaps(&room2));
        assert!(room2.overlaps(&room1));
        assert!(!room1.overlaps(&room3));
        assert!(!room3.overlaps(&room1));
    }

    #[test]
    fn test_room_floor_positions() {
        let room = Room::new(1, Position::new(5, 5), 4, 4);
        let floor: HashSet<_> = room.floor_positions().into_iter().collect();

        assert_eq!(floor.len(), 4);
        assert!(floor.contains(&Position::new(6, 6)));
        assert!(!floor.contains(&Position::new(5, 5)));
    }

    #[test]
    fn test_resolve_seed() {
        assert_eq!(utils::resolve_seed(7, true), 7);
    }

    #[test]
    fn test_validate_level_requires_single_exit() {
        let mut level = Level::new(1, 6, 3);
        for x in 1..5 {
            level.set_tile(Position::new(x, 1), crate::Tile::floor()).unwrap();
        }
        level.player_spawn = Position::new(1, 1);
        assert!(utils::validate_level(&level).is_err());

        level.set_tile(Position::new(4, 1), crate::Tile::new(TileType::Exit)).unwrap();
        level.exit_position = Some(Position::new(4, 1));
        assert!(utils::validate_level(&level).is_ok());

        level.set_tile(Position::new(3, 1), crate::Tile::new(TileType::Exit)).unwrap();
        assert!(utils::validate_level(&level).is_err());
    }
}
