//! # Glyph Table
//!
//! The one mapping from what is on a tile to a display character and an
//! integer observation code. Text rendering and observation encoding both go
//! through [`glyph_at`], so they can never disagree.

use crate::game::{ItemKind, Level, MonsterKind, Occupant, Position, TileType};
use serde::{Deserialize, Serialize};

/// Everything that can be drawn in a map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Glyph {
    Wall,
    Floor,
    Exit,
    Potion,
    Gold,
    Player,
    Zombie,
    Rothe,
    Vampire,
    /// Not yet seen, or void
    Unknown,
}

impl Glyph {
    /// Display character.
    ///
    /// # Examples
    ///
    /// ```
    /// use delverogue::Glyph;
    ///
    /// assert_eq!(Glyph::Player.ch(), '@');
    /// assert_eq!(Glyph::Wall.ch(), '#');
    /// ```
    pub fn ch(self) -> char {
        match self {
            Glyph::Wall => '#',
            Glyph::Floor => '.',
            Glyph::Exit => '>',
            Glyph::Potion => '+',
            Glyph::Gold => '$',
            Glyph::Player => '@',
            Glyph::Zombie => 'z',
            Glyph::Rothe => 'q',
            Glyph::Vampire => 'v',
            Glyph::Unknown => ' ',
        }
    }

    /// Observation code. Monsters are negative, terrain non-negative.
    pub fn code(self) -> i32 {
        match self {
            Glyph::Wall => 0,
            Glyph::Player => 1,
            Glyph::Floor => 2,
            Glyph::Potion => 3,
            Glyph::Exit => 4,
            Glyph::Gold => 5,
            Glyph::Rothe => -1,
            Glyph::Zombie => -2,
            Glyph::Vampire => -3,
            Glyph::Unknown => -4,
        }
    }

    pub fn from_char(ch: char) -> Option<Glyph> {
        Self::all().into_iter().find(|glyph| glyph.ch() == ch)
    }

    pub fn all() -> [Glyph; 10] {
        [
            Glyph::Wall,
            Glyph::Floor,
            Glyph::Exit,
            Glyph::Potion,
            Glyph::Gold,
            Glyph::Player,
            Glyph::Zombie,
            Glyph::Rothe,
            Glyph::Vampire,
            Glyph::Unknown,
        ]
    }

    pub fn for_terrain(tile_type: TileType) -> Glyph {
        match tile_type {
            TileType::Wall => Glyph::Wall,
            TileType::Floor => Glyph::Floor,
            TileType::Exit => Glyph::Exit,
            TileType::Item(ItemKind::Potion) => Glyph::Potion,
            TileType::Item(ItemKind::Gold(_)) => Glyph::Gold,
            TileType::Empty => Glyph::Unknown,
        }
    }

    pub fn for_monster(kind: MonsterKind) -> Glyph {
        match kind {
            MonsterKind::Zombie => Glyph::Zombie,
            MonsterKind::Rothe => Glyph::Rothe,
            MonsterKind::Vampire => Glyph::Vampire,
        }
    }
}

/// What the player perceives at `pos`.
///
/// With `perfect_info` every tile is shown. Otherwise tiles the player has
/// never seen are [`Glyph::Unknown`]; explored tiles show their current
/// contents, occupants included.
pub fn glyph_at(level: &Level, pos: Position, perfect_info: bool) -> Glyph {
    let Some(tile) = level.get_tile(pos) else {
        return Glyph::Unknown;
    };

    if !perfect_info && !tile.explored {
        return Glyph::Unknown;
    }

    match tile.occupant {
        Some(Occupant::Player) => Glyph::Player,
        Some(Occupant::Monster(id)) => level
            .monster(id)
            .map(|monster| Glyph::for_monster(monster.kind))
            .unwrap_or_else(|| Glyph::for_terrain(tile.tile_type)),
        None => Glyph::for_terrain(tile.tile_type),
    }
}
