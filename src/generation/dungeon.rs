//! # Dungeon Generation
//!
//! Procedural level layout generation using a room-and-corridor algorithm.
//!
//! Each attempt places rooms, joins consecutive rooms with L-shaped corridors,
//! sets the spawn and the exit, then hands the level to the item and encounter
//! passes. Attempts that break a structural rule are discarded and retried.

use crate::game::{Level, Position, Tile, TileType};
use crate::generation::{utils, EncounterGenerator, GenerationConfig, Generator, ItemGenerator, Room};
use crate::{RogueError, RogueResult};
use log::{debug, info, warn};
use rand::{rngs::StdRng, Rng};

/// Primary level generator using the room-and-corridor algorithm.
///
/// This generator creates levels by:
/// 1. Placing rooms randomly with collision detection
/// 2. Connecting consecutive rooms with L-shaped corridors
/// 3. Putting the spawn in the first room and the exit in the last
/// 4. Scattering items and spawning monsters
#[derive(Debug, Clone, Default)]
pub struct RoomCorridorGenerator {
    items: ItemGenerator,
    encounters: EncounterGenerator,
}

impl RoomCorridorGenerator {
    /// Creates a new level generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use delverogue::{generation::utils, GenerationConfig, Generator, RoomCorridorGenerator};
    ///
    /// let generator = RoomCorridorGenerator::new();
    /// let mut rng = utils::create_rng(42);
    /// let level = generator.generate(&GenerationConfig::new(), 1, &mut rng).unwrap();
    /// assert_eq!(level.exit_count(), 1);
    /// ```
    pub fn new() -> Self {
        Self {
            items: ItemGenerator::new(),
            encounters: EncounterGenerator::new(),
        }
    }

    /// Runs a single generation attempt.
    fn try_generate(
        &self,
        config: &GenerationConfig,
        depth: u32,
        rng: &mut StdRng,
    ) -> RogueResult<Level> {
        let mut level = Level::new(depth, config.width, config.height);

        let rooms = self.place_rooms(&mut level, config, rng)?;
        self.connect_with_l_corridors(&mut level, &rooms)?;
        self.add_spawn_and_exit(&mut level, &rooms, rng)?;
        self.items.populate(&mut level, config, rng)?;
        self.encounters.populate(&mut level, config, rng)?;

        Ok(level)
    }

    /// Places rooms without overlap and carves their interiors.
    fn place_rooms(
        &self,
        level: &mut Level,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> RogueResult<Vec<Room>> {
        let mut rooms = Vec::new();
        let room_count = rng.gen_range(config.min_rooms.max(2)..=config.max_rooms.max(2));

        for room_id in 0..room_count {
            if let Some(room) = self.try_place_room(level, config, rng, room_id, &rooms) {
                self.carve_room(level, &room)?;
                rooms.push(room);
            }
        }

        if rooms.len() < 2 {
            return Err(RogueError::GenerationFailure {
                depth: level.depth,
                attempts: 1,
                reason: format!("Only {} room(s) could be placed", rooms.len()),
            });
        }

        Ok(rooms)
    }

    /// Attempts to place a single room.
    fn try_place_room(
        &self,
        level: &Level,
        config: &GenerationConfig,
        rng: &mut StdRng,
        room_id: u32,
        existing_rooms: &[Room],
    ) -> Option<Room> {
        for _ in 0..config.max_placement_attempts {
            let width = rng.gen_range(config.min_room_size..=config.max_room_size);
            let height = rng.gen_range(config.min_room_size..=config.max_room_size);
            let x = rng.gen_range(1..(level.width as i32 - width as i32 - 1));
            let y = rng.gen_range(1..(level.height as i32 - height as i32 - 1));
            let room = Room::new(room_id, Position::new(x, y), width, height);

            if !self.room_fits_in_level(level, &room) {
                continue;
            }
            if existing_rooms.iter().any(|existing| room.overlaps(existing)) {
                continue;
            }
            return Some(room);
        }

        debug!("Skipping room {} after {} placement attempts", room_id, config.max_placement_attempts);
        None
    }

    /// Checks if a room fits within level boundaries.
    fn room_fits_in_level(&self, level: &Level, room: &Room) -> bool {
        room.top_left.x >= 1
            && room.top_left.y >= 1
            && room.top_left.x + (room.width as i32) < level.width as i32
            && room.top_left.y + (room.height as i32) < level.height as i32
    }

    /// Carves out a room in the level by setting tiles to floor.
    fn carve_room(&self, level: &mut Level, room: &Room) -> RogueResult<()> {
        for pos in room.floor_positions() {
            level.set_tile(pos, Tile::floor())?;
        }
        Ok(())
    }

    /// Joins each room to the next one.
    fn connect_with_l_corridors(&self, level: &mut Level, rooms: &[Room]) -> RogueResult<()> {
        for pair in rooms.windows(2) {
            self.carve_l_corridor(level, pair[0].center(), pair[1].center())?;
        }
        Ok(())
    }

    /// Carves an L-shaped corridor between two points, horizontal leg first.
    fn carve_l_corridor(&self, level: &mut Level, start: Position, end: Position) -> RogueResult<()> {
        for x in start.x.min(end.x)..=start.x.max(end.x) {
            let pos = Position::new(x, start.y);
            if level.is_valid_position(pos) {
                level.set_tile(pos, Tile::floor())?;
            }
        }
        for y in start.y.min(end.y)..=start.y.max(end.y) {
            let pos = Position::new(end.x, y);
            if level.is_valid_position(pos) {
                level.set_tile(pos, Tile::floor())?;
            }
        }
        Ok(())
    }

    /// Puts the spawn at the centre of the first room and the exit on a random
    /// floor tile of the last room.
    fn add_spawn_and_exit(
        &self,
        level: &mut Level,
        rooms: &[Room],
        rng: &mut StdRng,
    ) -> RogueResult<()> {
        let (Some(first), Some(last)) = (rooms.first(), rooms.last()) else {
            return Err(RogueError::InvalidState("No rooms to place the spawn in".to_string()));
        };

        level.player_spawn = first.center();

        let candidates: Vec<Position> = last
            .floor_positions()
            .into_iter()
            .filter(|pos| *pos != level.player_spawn)
            .collect();
        if candidates.is_empty() {
            return Err(RogueError::GenerationFailure {
                depth: level.depth,
                attempts: 1,
                reason: "Last room has no tile for the exit".to_string(),
            });
        }
        let exit = candidates[rng.gen_range(0..candidates.len())];
        level.set_tile(exit, Tile::new(TileType::Exit))?;
        level.exit_position = Some(exit);

        Ok(())
    }
}

impl Generator<Level> for RoomCorridorGenerator {
    /// Generates a level, retrying discarded attempts up to
    /// `max_generation_attempts` times.
    fn generate(&self, config: &GenerationConfig, depth: u32, rng: &mut StdRng) -> RogueResult<Level> {
        config.validate()?;

        let attempts = config.max_generation_attempts.max(1);
        let mut last_reason = String::new();

        for attempt in 1..=attempts {
            let outcome = self
                .try_generate(config, depth, rng)
                .and_then(|level| self.validate(&level, config).map(|_| level));

            match outcome {
                Ok(level) => {
                    info!(
                        "Generated depth {} level ({} monsters, {} items) on attempt {}",
                        depth,
                        level.monsters.len(),
                        level.item_count(),
                        attempt
                    );
                    return Ok(level);
                }
                Err(RogueError::GenerationFailure { reason, .. }) => {
                    warn!("Discarding depth {} attempt {}: {}", depth, attempt, reason);
                    last_reason = reason;
                }
                Err(e) => {
                    warn!("Discarding depth {} attempt {}: {}", depth, attempt, e);
                    last_reason = e.to_string();
                }
            }
        }

        Err(RogueError::GenerationFailure {
            depth,
            attempts,
            reason: last_reason,
        })
    }

    fn validate(&self, level: &Level, config: &GenerationConfig) -> RogueResult<()> {
        utils::validate_level(level)?;

        let expected = config.monster_count(level.depth) as usize;
        if level.monsters.len() != expected {
            return Err(RogueError::GenerationFailure {
                depth: level.depth,
                attempts: 1,
                reason: format!("Expected {} monsters, found {}", expected, level.monsters.len()),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_fits_in_level() {
        let generator = RoomCorridorGenerator::new();
        let level = Level::new(1, 15, 18);

        let good_room = Room::new(1, Position::new(1, 1), 7, 7);
        let bad_room = Room::new(2, Position::new(10, 12), 7, 7);

        assert!(generator.room_fits_in_level(&level, &good_room));
        assert!(!generator.room_fits_in_level(&level, &bad_room));
    }

    #[test]
    fn test_room_must_stop_short_of_the_border() {
        let generator = RoomCorridorGenerator::new();
        let level = Level::new(1, 15, 18);

        // Walls on the outermost column and row do not fit
        let flush = Room::new(1, Position::new(8, 11), 7, 7);
        let past_right = Room::new(2, Position::new(9, 1), 7, 7);
        let past_bottom = Room::new(3, Position::new(1, 12), 7, 7);

        let inside = Room::new(0, Position::new(7, 10), 7, 7);

        assert!(generator.room_fits_in_level(&level, &inside));
        assert!(!generator.room_fits_in_level(&level, &flush));
        assert!(!generator.room_fits_in_level(&level, &past_right));
        assert!(!generator.room_fits_in_level(&level, &past_bottom));
    }

    #[test]
    fn test_l_corridor_carving() {
        let generator = RoomCorridorGenerator::new();
        let mut level = Level::new(1, 20, 20);

        let start = Position::new(5, 5);
        let end = Position::new(15, 15);
        generator.carve_l_corridor(&mut level, start, end).unwrap();

        assert_eq!(level.tile_type(start), Some(TileType::Floor));
        assert_eq!(level.tile_type(end), Some(TileType::Floor));
        assert_eq!(level.tile_type(Position::new(15, 5)), Some(TileType::Floor));
        assert_eq!(level.tile_type(Position::new(5, 15)), Some(TileType::Wall));
    }

    #[test]
    fn test_generated_level_is_valid() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig::new();
        let mut rng = utils::create_rng(12345);

        let level = generator.generate(&config, 1, &mut rng).unwrap();
        assert_eq!(level.width, 15);
        assert_eq!(level.height, 18);
        assert_eq!(level.depth, 1);
        assert!(generator.validate(&level, &config).is_ok());
        assert_eq!(level.tile_type(level.player_spawn), Some(TileType::Floor));
        assert_ne!(level.exit_position, Some(level.player_spawn));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig::new();

        let a = generator.generate(&config, 3, &mut utils::create_rng(99)).unwrap();
        let b = generator.generate(&config, 3, &mut utils::create_rng(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_impossible_monster_load_fails() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig {
            base_monsters: 500,
            max_monsters: 500,
            max_generation_attempts: 3,
            ..GenerationConfig::new()
        };
        let mut rng = utils::create_rng(1);

        match generator.generate(&config, 1, &mut rng) {
            Err(RogueError::GenerationFailure { depth, attempts, .. }) => {
                assert_eq!(depth, 1);
                assert_eq!(attempts, 3);
            }
            other => panic!("expected generation failure, got {:?}", other),
        }
    }
}
