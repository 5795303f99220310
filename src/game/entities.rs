//! # Entities
//!
//! The player and monster records, described through three capability traits.
//!
//! The player is unique and outlives levels. Monsters belong to the level that
//! spawned them and disappear with it or when killed.

use crate::config;
use crate::game::Position;
use serde::{Deserialize, Serialize};

/// Something that occupies a grid position.
pub trait Movable {
    fn position(&self) -> Position;
    fn set_position(&mut self, position: Position);
}

/// Something that deals melee damage.
pub trait Attacker {
    fn attack_power(&self) -> u32;
}

/// Something with hit points.
pub trait Damageable {
    fn hp(&self) -> u32;
    fn max_hp(&self) -> u32;
    fn set_hp(&mut self, hp: u32);

    /// Applies damage, flooring hit points at zero.
    ///
    /// Returns the damage actually absorbed.
    fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.hp();
        self.set_hp(before.saturating_sub(amount));
        before - self.hp()
    }

    /// Restores hit points up to the maximum. Returns the amount healed.
    fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp();
        self.set_hp(before.saturating_add(amount).min(self.max_hp()));
        self.hp() - before
    }

    fn is_alive(&self) -> bool {
        self.hp() > 0
    }

    fn is_dead(&self) -> bool {
        !self.is_alive()
    }
}

/// Items lying on the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Heals on pickup, or is carried if the player is already at full health
    Potion,
    /// A pile of coins
    Gold(u32),
}

/// Identifier of a monster within its level. Equal to its spawn index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(pub u32);

/// The monster bestiary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterKind {
    Zombie,
    Rothe,
    Vampire,
}

impl MonsterKind {
    /// Returns every kind, weakest first.
    pub fn all() -> [MonsterKind; 3] {
        [MonsterKind::Zombie, MonsterKind::Rothe, MonsterKind::Vampire]
    }

    /// Shallowest depth at which this kind spawns.
    pub fn min_depth(self) -> u32 {
        match self {
            MonsterKind::Zombie => 1,
            MonsterKind::Rothe => 2,
            MonsterKind::Vampire => 4,
        }
    }

    pub fn base_hp(self) -> u32 {
        match self {
            MonsterKind::Zombie => 3,
            MonsterKind::Rothe => 4,
            MonsterKind::Vampire => 6,
        }
    }

    pub fn base_attack(self) -> u32 {
        match self {
            MonsterKind::Zombie => 1,
            MonsterKind::Rothe => 2,
            MonsterKind::Vampire => 3,
        }
    }

    /// Kinds that may appear at the given depth.
    pub fn available_at(depth: u32) -> Vec<MonsterKind> {
        Self::all()
            .into_iter()
            .filter(|kind| kind.min_depth() <= depth)
            .collect()
    }
}

/// The player character.
///
/// # Examples
///
/// ```
/// use delverogue::{Damageable, Player};
///
/// let player = Player::new();
/// assert!(player.is_alive());
/// assert_eq!(player.gold, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub position: Position,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub gold: u32,
    /// Carried potions
    pub inventory: Vec<ItemKind>,
    pub inventory_capacity: usize,
}

impl Player {
    /// Creates a fresh player with default stats. Position is assigned when
    /// the engine places the player on a level.
    pub fn new() -> Self {
        Self::with_stats(config::DEFAULT_PLAYER_HEALTH, config::DEFAULT_PLAYER_ATTACK)
    }

    pub fn with_stats(max_hp: u32, attack: u32) -> Self {
        Self {
            position: Position::new(0, 0),
            hp: max_hp,
            max_hp,
            attack,
            gold: 0,
            inventory: Vec::new(),
            inventory_capacity: config::DEFAULT_INVENTORY_CAPACITY,
        }
    }

    /// Number of potions currently carried.
    pub fn potion_count(&self) -> usize {
        self.inventory
            .iter()
            .filter(|item| **item == ItemKind::Potion)
            .count()
    }

    /// Stores an item if there is room. Returns whether it was stored.
    pub fn stash(&mut self, item: ItemKind) -> bool {
        if self.inventory.len() >= self.inventory_capacity {
            return false;
        }
        self.inventory.push(item);
        true
    }

    /// Removes one carried potion. Returns whether there was one.
    pub fn take_potion(&mut self) -> bool {
        match self.inventory.iter().position(|item| *item == ItemKind::Potion) {
            Some(index) => {
                self.inventory.remove(index);
                true
            }
            None => false,
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Movable for Player {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

impl Attacker for Player {
    fn attack_power(&self) -> u32 {
        self.attack
    }
}

impl Damageable for Player {
    fn hp(&self) -> u32 {
        self.hp
    }

    fn max_hp(&self) -> u32 {
        self.max_hp
    }

    fn set_hp(&mut self, hp: u32) {
        self.hp = hp;
    }
}

/// A hostile creature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    pub kind: MonsterKind,
    pub position: Position,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    /// Gold handed to the player when this monster dies
    pub bounty: u32,
}

impl Monster {
    /// Creates a monster of the given kind with stats scaled by depth.
    ///
    /// Every two levels below the first add one hit point.
    pub fn new(id: MonsterId, kind: MonsterKind, position: Position, depth: u32, bounty: u32) -> Self {
        let max_hp = kind.base_hp() + depth.saturating_sub(1) / 2;
        Self {
            id,
            kind,
            position,
            hp: max_hp,
            max_hp,
            attack: kind.base_attack(),
            bounty,
        }
    }
}

impl Movable for Monster {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

impl Attacker for Monster {
    fn attack_power(&self) -> u32 {
        self.attack
    }
}

impl Damageable for Monster {
    fn hp(&self) -> u32 {
        self.hp
    }

    fn max_hp(&self) -> u32 {
        self.max_hp
    }

    fn set_hp(&mut self, hp: u32) {
        self.hp = hp;
    }
}
