//! # World Representation
//!
//! The tile grid of a single dungeon level and the monsters living on it.

use crate::game::{Damageable, ItemKind, Monster, MonsterId, Movable, Position};
use crate::{RogueError, RogueResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Terrain kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    Wall,
    Floor,
    /// Stairs to the next depth
    Exit,
    /// Floor with an item on it
    Item(ItemKind),
    /// Void. Blocks movement but not sight
    Empty,
}

impl TileType {
    /// Whether an entity can stand on this terrain.
    pub fn is_passable(self) -> bool {
        matches!(self, TileType::Floor | TileType::Exit | TileType::Item(_))
    }

    /// Whether this terrain stops line of sight.
    pub fn blocks_sight(self) -> bool {
        self == TileType::Wall
    }
}

/// Who is standing on a tile. A reference, never ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    Player,
    Monster(MonsterId),
}

/// A single cell of the level grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub tile_type: TileType,
    /// In the player's field of view this tick
    pub visible: bool,
    /// Seen at least once on this level. Never reset
    pub explored: bool,
    /// Already counted by the consumer of the exploration signal
    pub already_explored: bool,
    pub occupant: Option<Occupant>,
}

impl Tile {
    pub fn new(tile_type: TileType) -> Self {
        Self {
            tile_type,
            visible: false,
            explored: false,
            already_explored: false,
            occupant: None,
        }
    }

    pub fn wall() -> Self {
        Self::new(TileType::Wall)
    }

    pub fn floor() -> Self {
        Self::new(TileType::Floor)
    }

    /// Marks the tile visible. Visibility implies exploration.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if visible {
            self.explored = true;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_explored(&self) -> bool {
        self.explored
    }

    /// Explored plain floor nobody has counted yet.
    pub fn is_newly_explored(&self) -> bool {
        self.explored
            && !self.already_explored
            && self.tile_type == TileType::Floor
            && self.occupant.is_none()
    }
}

/// A single dungeon level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// Depth of this level, starting at 1
    pub depth: u32,
    pub width: u32,
    pub height: u32,
    /// Row-major grid, indexed `tiles[y][x]`
    pub tiles: Vec<Vec<Tile>>,
    pub player_spawn: Position,
    pub exit_position: Option<Position>,
    /// Live monsters in spawn order
    pub monsters: Vec<Monster>,
}

impl Level {
    /// Creates a level filled with walls.
    pub fn new(depth: u32, width: u32, height: u32) -> Self {
        Self {
            depth,
            width,
            height,
            tiles: vec![vec![Tile::wall(); width as usize]; height as usize],
            player_spawn: Position::new(0, 0),
            exit_position: None,
            monsters: Vec::new(),
        }
    }

    pub fn is_valid_position(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    pub fn get_tile(&self, pos: Position) -> Option<&Tile> {
        if !self.is_valid_position(pos) {
            return None;
        }
        self.tiles
            .get(pos.y as usize)
            .and_then(|row| row.get(pos.x as usize))
    }

    pub fn get_tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        if !self.is_valid_position(pos) {
            return None;
        }
        self.tiles
            .get_mut(pos.y as usize)
            .and_then(|row| row.get_mut(pos.x as usize))
    }

    /// Replaces the tile at `pos`, keeping its occupant.
    pub fn set_tile(&mut self, pos: Position, tile: Tile) -> RogueResult<()> {
        let slot = self
            .get_tile_mut(pos)
            .ok_or_else(|| RogueError::InvalidState(format!("Position {} out of bounds", pos)))?;
        let occupant = slot.occupant;
        *slot = tile;
        slot.occupant = occupant;
        Ok(())
    }

    /// Terrain at `pos`, or `None` off the grid.
    pub fn tile_type(&self, pos: Position) -> Option<TileType> {
        self.get_tile(pos).map(|tile| tile.tile_type)
    }

    pub fn occupant(&self, pos: Position) -> Option<Occupant> {
        self.get_tile(pos).and_then(|tile| tile.occupant)
    }

    /// Iterates over every position of the grid in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Position::new(x, y)))
    }

    /// All positions whose terrain matches the predicate.
    pub fn positions_where(&self, predicate: impl Fn(TileType) -> bool) -> Vec<Position> {
        self.positions()
            .filter(|pos| self.tile_type(*pos).map(&predicate).unwrap_or(false))
            .collect()
    }

    pub fn floor_positions(&self) -> Vec<Position> {
        self.positions_where(|tile_type| tile_type == TileType::Floor)
    }

    pub fn exit_count(&self) -> usize {
        self.positions_where(|tile_type| tile_type == TileType::Exit)
            .len()
    }

    /// Number of item tiles still lying on the level.
    pub fn item_count(&self) -> usize {
        self.positions_where(|tile_type| matches!(tile_type, TileType::Item(_)))
            .len()
    }

    pub fn potion_count(&self) -> usize {
        self.positions_where(|tile_type| tile_type == TileType::Item(ItemKind::Potion))
            .len()
    }

    /// Passable positions reachable from `start` by cardinal steps.
    pub fn reachable_from(&self, start: Position) -> HashSet<Position> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        if !self.tile_type(start).map(TileType::is_passable).unwrap_or(false) {
            return visited;
        }
        visited.insert(start);
        queue.push_back(start);

        while let Some(pos) = queue.pop_front() {
            for adjacent in pos.cardinal_adjacent_positions() {
                if visited.contains(&adjacent) {
                    continue;
                }
                if self.tile_type(adjacent).map(TileType::is_passable).unwrap_or(false) {
                    visited.insert(adjacent);
                    queue.push_back(adjacent);
                }
            }
        }

        visited
    }

    /// Whether every passable tile is reachable from the spawn.
    pub fn is_fully_connected(&self) -> bool {
        let reachable = self.reachable_from(self.player_spawn);
        self.positions_where(TileType::is_passable)
            .iter()
            .all(|pos| reachable.contains(pos))
    }

    /// Tiles the player has seen but the consumer has not yet counted.
    pub fn newly_explored_count(&self) -> u32 {
        self.tiles
            .iter()
            .flat_map(|row| row.iter())
            .filter(|tile| tile.is_newly_explored())
            .count() as u32
    }

    /// Marks newly explored tiles as counted and returns how many there were.
    pub fn acknowledge_explored(&mut self) -> u32 {
        let mut count = 0;
        for tile in self.tiles.iter_mut().flat_map(|row| row.iter_mut()) {
            if tile.is_newly_explored() {
                tile.already_explored = true;
                count += 1;
            }
        }
        count
    }

    pub fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.iter().find(|monster| monster.id == id)
    }

    pub fn monster_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.monsters.iter_mut().find(|monster| monster.id == id)
    }

    /// Ids of live monsters in spawn order.
    pub fn monster_ids(&self) -> Vec<MonsterId> {
        self.monsters.iter().map(|monster| monster.id).collect()
    }

    /// Adds a monster and points its tile at it.
    pub fn add_monster(&mut self, monster: Monster) -> RogueResult<()> {
        let position = monster.position;
        let tile = self.get_tile_mut(position).ok_or_else(|| {
            RogueError::InvalidState(format!("Monster spawn {} out of bounds", position))
        })?;
        if tile.occupant.is_some() {
            return Err(RogueError::InvalidState(format!(
                "Monster spawn {} already occupied",
                position
            )));
        }
        tile.occupant = Some(Occupant::Monster(monster.id));
        self.monsters.push(monster);
        Ok(())
    }

    /// Removes a monster from both the grid and the monster list.
    pub fn remove_monster(&mut self, id: MonsterId) -> Option<Monster> {
        let index = self.monsters.iter().position(|monster| monster.id == id)?;
        let monster = self.monsters.remove(index);
        if let Some(tile) = self.get_tile_mut(monster.position) {
            if tile.occupant == Some(Occupant::Monster(id)) {
                tile.occupant = None;
            }
        }
        Some(monster)
    }

    /// Moves whatever occupies `from` onto `to`.
    pub fn move_occupant(&mut self, from: Position, to: Position) -> RogueResult<()> {
        let occupant = self
            .get_tile_mut(from)
            .and_then(|tile| tile.occupant.take())
            .ok_or_else(|| RogueError::InvalidState(format!("No occupant at {}", from)))?;
        let target = self
            .get_tile_mut(to)
            .ok_or_else(|| RogueError::InvalidState(format!("Position {} out of bounds", to)))?;
        target.occupant = Some(occupant);
        if let Occupant::Monster(id) = occupant {
            if let Some(monster) = self.monster_mut(id) {
                monster.set_position(to);
            }
        }
        Ok(())
    }

    /// Verifies that every occupant reference names a live entity standing on
    /// that tile, and that every live monster is referenced by its tile.
    pub fn check_invariants(&self, player_position: Position) -> RogueResult<()> {
        for pos in self.positions() {
            match self.occupant(pos) {
                Some(Occupant::Player) if pos != player_position => {
                    return Err(RogueError::DeadEntityReference { position: pos });
                }
                Some(Occupant::Monster(id)) => match self.monster(id) {
                    Some(monster) if monster.position == pos && monster.is_alive() => {}
                    _ => return Err(RogueError::DeadEntityReference { position: pos }),
                },
                _ => {}
            }
        }

        for monster in &self.monsters {
            if self.occupant(monster.position) != Some(Occupant::Monster(monster.id)) {
                return Err(RogueError::InvalidState(format!(
                    "Monster {:?} is not registered on its tile {}",
                    monster.id, monster.position
                )));
            }
        }

        if self.occupant(player_position) != Some(Occupant::Player) {
            return Err(RogueError::InvalidState(format!(
                "Player is not registered on its tile {}",
                player_position
            )));
        }

        Ok(())
    }
}
