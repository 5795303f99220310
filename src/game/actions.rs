//! # Action System
//!
//! Resolution of directional bump actions.
//!
//! A bump is a single intent ("go east") that becomes exactly one of five
//! outcomes depending on what lies in that direction. Decision order:
//!
//! 1. Off the grid, a wall or void: [`ActionKind::Blocked`]
//! 2. The opponent stands there: [`ActionKind::Attack`]
//! 3. An item lies there: [`ActionKind::Interact`] (player only)
//! 4. The exit: [`ActionKind::Exit`] (player only)
//! 5. Otherwise: [`ActionKind::Move`]
//!
//! Monsters step over items and the exit as if they were floor. The tile keeps
//! its item or exit and only the occupant reference moves.

use crate::game::{
    Attacker, Damageable, Direction, EngineConfig, GameEvent, ItemKind, Level, MonsterId,
    MonsterKind, Movable, Occupant, Player, Position, Tile, TileType,
};
use crate::{RogueError, RogueResult};
use log::debug;
use serde::{Deserialize, Serialize};

/// The five mutually exclusive bump outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Move,
    Attack,
    Blocked,
    Interact,
    Exit,
}

/// Who is acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actor {
    Player,
    Monster(MonsterId),
}

/// Everything a resolved bump changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub actor: Actor,
    pub kind: ActionKind,
    /// The tile the bump was aimed at
    pub destination: Position,
    pub damage_dealt: u32,
    /// Kind of the monster this action killed, if any
    pub killed: Option<MonsterKind>,
    pub player_killed: bool,
    pub item: Option<ItemKind>,
    pub healed: u32,
    pub gold_gained: u32,
    pub events: Vec<GameEvent>,
}

impl ActionOutcome {
    fn new(actor: Actor, kind: ActionKind, destination: Position) -> Self {
        Self {
            actor,
            kind,
            destination,
            damage_dealt: 0,
            killed: None,
            player_killed: false,
            item: None,
            healed: 0,
            gold_gained: 0,
            events: Vec::new(),
        }
    }
}

/// A single directional bump by an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BumpAction {
    pub actor: Actor,
    pub direction: Direction,
}

impl BumpAction {
    pub fn new(actor: Actor, direction: Direction) -> Self {
        Self { actor, direction }
    }

    /// Current position of the acting entity.
    pub fn actor_position(&self, level: &Level, player: &Player) -> RogueResult<Position> {
        match self.actor {
            Actor::Player => Ok(player.position()),
            Actor::Monster(id) => level
                .monster(id)
                .map(|monster| monster.position())
                .ok_or_else(|| {
                    RogueError::InvalidState(format!("Monster {:?} is not on the level", id))
                }),
        }
    }

    /// Decides which outcome this bump would have, without changing anything.
    pub fn classify(&self, level: &Level, player: &Player) -> RogueResult<(ActionKind, Position)> {
        let from = self.actor_position(level, player)?;
        let destination = from.step(self.direction);

        let tile = match level.get_tile(destination) {
            Some(tile) if tile.tile_type.is_passable() => tile,
            _ => return Ok((ActionKind::Blocked, destination)),
        };

        match (self.actor, tile.occupant) {
            (Actor::Player, Some(Occupant::Monster(id))) => {
                debug_assert!(
                    level.monster(id).is_some(),
                    "dangling monster reference at {}",
                    destination
                );
                if level.monster(id).is_none() {
                    return Err(RogueError::DeadEntityReference {
                        position: destination,
                    });
                }
                return Ok((ActionKind::Attack, destination));
            }
            (Actor::Monster(_), Some(Occupant::Player)) => {
                return Ok((ActionKind::Attack, destination));
            }
            (_, Some(_)) => return Ok((ActionKind::Blocked, destination)),
            (_, None) => {}
        }

        let kind = match (self.actor, tile.tile_type) {
            (Actor::Player, TileType::Item(_)) => ActionKind::Interact,
            (Actor::Player, TileType::Exit) => ActionKind::Exit,
            _ => ActionKind::Move,
        };
        Ok((kind, destination))
    }

    /// Resolves the bump, mutating the level and the player.
    pub fn execute(
        &self,
        level: &mut Level,
        player: &mut Player,
        config: &EngineConfig,
    ) -> RogueResult<ActionOutcome> {
        let (kind, destination) = self.classify(level, player)?;
        let from = self.actor_position(level, player)?;
        let mut outcome = ActionOutcome::new(self.actor, kind, destination);

        match kind {
            ActionKind::Blocked => {
                outcome.events.push(GameEvent::ActionBlocked {
                    actor: self.actor,
                    destination,
                });
            }
            ActionKind::Attack => self.resolve_attack(level, player, destination, &mut outcome)?,
            ActionKind::Interact => {
                self.resolve_pickup(level, player, destination, config, &mut outcome)?;
                relocate(level, player, self.actor, from, destination)?;
                outcome.events.push(GameEvent::EntityMoved {
                    actor: self.actor,
                    from,
                    to: destination,
                });
            }
            ActionKind::Exit => {
                outcome.events.push(GameEvent::ExitReached {
                    position: destination,
                });
            }
            ActionKind::Move => {
                relocate(level, player, self.actor, from, destination)?;
                outcome.events.push(GameEvent::EntityMoved {
                    actor: self.actor,
                    from,
                    to: destination,
                });
            }
        }

        debug!(
            "{:?} bumped {:?} from {} -> {:?} at {}",
            self.actor, self.direction, from, kind, destination
        );

        Ok(outcome)
    }

    fn resolve_attack(
        &self,
        level: &mut Level,
        player: &mut Player,
        destination: Position,
        outcome: &mut ActionOutcome,
    ) -> RogueResult<()> {
        match self.actor {
            Actor::Player => {
                let id = match level.occupant(destination) {
                    Some(Occupant::Monster(id)) => id,
                    _ => {
                        return Err(RogueError::InvalidState(format!(
                            "Attack target at {} vanished",
                            destination
                        )))
                    }
                };
                let monster = level
                    .monster_mut(id)
                    .ok_or(RogueError::DeadEntityReference {
                        position: destination,
                    })?;
                let damage = monster.take_damage(player.attack_power());
                outcome.damage_dealt = damage;
                outcome.events.push(GameEvent::EntityAttacked {
                    attacker: Actor::Player,
                    defender: Actor::Monster(id),
                    damage,
                    remaining_hp: monster.hp(),
                });

                if monster.is_dead() {
                    let kind = monster.kind;
                    let bounty = monster.bounty;
                    level.remove_monster(id);
                    player.gold += bounty;
                    outcome.killed = Some(kind);
                    outcome.gold_gained = bounty;
                    outcome.events.push(GameEvent::EntityDied {
                        actor: Actor::Monster(id),
                        killer: Some(Actor::Player),
                    });
                    if bounty > 0 {
                        outcome.events.push(GameEvent::GoldCollected { amount: bounty });
                    }
                }
            }
            Actor::Monster(id) => {
                let attack = level
                    .monster(id)
                    .map(|monster| monster.attack_power())
                    .ok_or_else(|| {
                        RogueError::InvalidState(format!("Monster {:?} is not on the level", id))
                    })?;
                let damage = player.take_damage(attack);
                outcome.damage_dealt = damage;
                outcome.events.push(GameEvent::EntityAttacked {
                    attacker: self.actor,
                    defender: Actor::Player,
                    damage,
                    remaining_hp: player.hp(),
                });
                if player.is_dead() {
                    outcome.player_killed = true;
                    outcome.events.push(GameEvent::EntityDied {
                        actor: Actor::Player,
                        killer: Some(self.actor),
                    });
                }
            }
        }
        Ok(())
    }

    fn resolve_pickup(
        &self,
        level: &mut Level,
        player: &mut Player,
        destination: Position,
        config: &EngineConfig,
        outcome: &mut ActionOutcome,
    ) -> RogueResult<()> {
        let item = match level.tile_type(destination) {
            Some(TileType::Item(item)) => item,
            _ => {
                return Err(RogueError::InvalidState(format!(
                    "No item to pick up at {}",
                    destination
                )))
            }
        };
        level.set_tile(destination, Tile::floor())?;
        outcome.item = Some(item);
        outcome.events.push(GameEvent::ItemPickedUp {
            item,
            position: destination,
        });

        match item {
            ItemKind::Potion => {
                if player.hp() < player.max_hp() {
                    let healed = player.heal(config.potion_heal);
                    outcome.healed = healed;
                    outcome.events.push(GameEvent::PotionQuaffed { healed });
                } else if !player.stash(item) {
                    debug!("Inventory full, potion at {} wasted", destination);
                }
            }
            ItemKind::Gold(amount) => {
                player.gold += amount;
                outcome.gold_gained = amount;
                outcome.events.push(GameEvent::GoldCollected { amount });
            }
        }
        Ok(())
    }
}

/// Moves an actor between adjacent tiles, keeping occupant references in step.
fn relocate(
    level: &mut Level,
    player: &mut Player,
    actor: Actor,
    from: Position,
    to: Position,
) -> RogueResult<()> {
    level.move_occupant(from, to)?;
    if actor == Actor::Player {
        player.set_position(to);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Monster;

    /// 7x5 room, player at (1,2), a zombie at (3,2), a potion at (1,1),
    /// gold at (1,3) and the exit at (5,2).
    fn arena() -> (Level, Player) {
        let mut level = Level::new(1, 7, 5);
        for y in 1..4 {
            for x in 1..6 {
                level.set_tile(Position::new(x, y), Tile::floor()).unwrap();
            }
        }
        level
            .set_tile(Position::new(1, 1), Tile::new(TileType::Item(ItemKind::Potion)))
            .unwrap();
        level
            .set_tile(Position::new(1, 3), Tile::new(TileType::Item(ItemKind::Gold(7))))
            .unwrap();
        level.set_tile(Position::new(5, 2), Tile::new(TileType::Exit)).unwrap();
        level.exit_position = Some(Position::new(5, 2));
        level
            .add_monster(Monster::new(MonsterId(0), MonsterKind::Zombie, Position::new(3, 2), 1, 4))
            .unwrap();

        let mut player = Player::with_stats(10, 2);
        player.position = Position::new(1, 2);
        level.get_tile_mut(player.position).unwrap().occupant = Some(Occupant::Player);
        (level, player)
    }

    fn bump(level: &mut Level, player: &mut Player, actor: Actor, direction: Direction) -> ActionOutcome {
        BumpAction::new(actor, direction)
            .execute(level, player, &EngineConfig::default())
            .unwrap()
    }

    #[test]
    fn test_blocked_by_wall() {
        let (mut level, mut player) = arena();
        let outcome = bump(&mut level, &mut player, Actor::Player, Direction::West);
        assert_eq!(outcome.kind, ActionKind::Blocked);
        assert_eq!(player.position, Position::new(1, 2));
        assert_eq!(level.occupant(Position::new(1, 2)), Some(Occupant::Player));
    }

    #[test]
    fn test_move_updates_both_tiles() {
        let (mut level, mut player) = arena();
        let outcome = bump(&mut level, &mut player, Actor::Player, Direction::East);
        assert_eq!(outcome.kind, ActionKind::Move);
        assert_eq!(player.position, Position::new(2, 2));
        assert_eq!(level.occupant(Position::new(1, 2)), None);
        assert_eq!(level.occupant(Position::new(2, 2)), Some(Occupant::Player));
        level.check_invariants(player.position).unwrap();
    }

    #[test]
    fn test_player_attack_kills_and_removes_monster() {
        let (mut level, mut player) = arena();
        bump(&mut level, &mut player, Actor::Player, Direction::East);

        let first = bump(&mut level, &mut player, Actor::Player, Direction::East);
        assert_eq!(first.kind, ActionKind::Attack);
        assert_eq!(first.damage_dealt, 2);
        assert_eq!(level.monster(MonsterId(0)).unwrap().hp, 1);

        let second = bump(&mut level, &mut player, Actor::Player, Direction::East);
        assert_eq!(second.kind, ActionKind::Attack);
        assert_eq!(second.damage_dealt, 1);
        assert_eq!(second.killed, Some(MonsterKind::Zombie));
        assert!(level.monsters.is_empty());
        assert_eq!(level.occupant(Position::new(3, 2)), None);
        assert_eq!(player.gold, 4);
        level.check_invariants(player.position).unwrap();
    }

    #[test]
    fn test_monster_attacks_player() {
        let (mut level, mut player) = arena();
        level.move_occupant(Position::new(3, 2), Position::new(2, 2)).unwrap();
        let outcome = bump(&mut level, &mut player, Actor::Monster(MonsterId(0)), Direction::West);
        assert_eq!(outcome.kind, ActionKind::Attack);
        assert_eq!(player.hp, 9);
    }

    #[test]
    fn test_lethal_monster_attack_floors_at_zero() {
        let (mut level, mut player) = arena();
        player.hp = 1;
        level.monster_mut(MonsterId(0)).unwrap().attack = 5;
        level.move_occupant(Position::new(3, 2), Position::new(2, 2)).unwrap();
        let outcome = bump(&mut level, &mut player, Actor::Monster(MonsterId(0)), Direction::West);
        assert_eq!(player.hp, 0);
        assert_eq!(outcome.damage_dealt, 1);
        assert!(outcome.player_killed);
    }

    #[test]
    fn test_potion_pickup_heals_and_clears_tile() {
        let (mut level, mut player) = arena();
        player.hp = 4;
        let outcome = bump(&mut level, &mut player, Actor::Player, Direction::North);
        assert_eq!(outcome.kind, ActionKind::Interact);
        assert_eq!(outcome.item, Some(ItemKind::Potion));
        assert_eq!(outcome.healed, EngineConfig::default().potion_heal.min(6));
        assert_eq!(level.tile_type(Position::new(1, 1)), Some(TileType::Floor));
        assert_eq!(player.position, Position::new(1, 1));
        assert_eq!(level.potion_count(), 0);
    }

    #[test]
    fn test_potion_at_full_health_is_carried() {
        let (mut level, mut player) = arena();
        let outcome = bump(&mut level, &mut player, Actor::Player, Direction::North);
        assert_eq!(outcome.kind, ActionKind::Interact);
        assert_eq!(outcome.healed, 0);
        assert_eq!(player.potion_count(), 1);
    }

    #[test]
    fn test_gold_pickup() {
        let (mut level, mut player) = arena();
        let outcome = bump(&mut level, &mut player, Actor::Player, Direction::South);
        assert_eq!(outcome.kind, ActionKind::Interact);
        assert_eq!(player.gold, 7);
        assert_eq!(outcome.gold_gained, 7);
        assert_eq!(level.item_count(), 1);
    }

    #[test]
    fn test_exit_does_not_move_player() {
        let (mut level, mut player) = arena();
        level.remove_monster(MonsterId(0));
        for _ in 0..3 {
            bump(&mut level, &mut player, Actor::Player, Direction::East);
        }
        assert_eq!(player.position, Position::new(4, 2));
        let outcome = bump(&mut level, &mut player, Actor::Player, Direction::East);
        assert_eq!(outcome.kind, ActionKind::Exit);
        assert_eq!(player.position, Position::new(4, 2));
        assert_eq!(level.tile_type(Position::new(5, 2)), Some(TileType::Exit));
    }

    #[test]
    fn test_monsters_walk_over_items_without_taking_them() {
        let (mut level, mut player) = arena();
        level.move_occupant(Position::new(3, 2), Position::new(2, 1)).unwrap();

        let onto = bump(&mut level, &mut player, Actor::Monster(MonsterId(0)), Direction::West);
        assert_eq!(onto.kind, ActionKind::Move);
        assert_eq!(onto.item, None);
        assert_eq!(level.tile_type(Position::new(1, 1)), Some(TileType::Item(ItemKind::Potion)));
        assert_eq!(level.occupant(Position::new(1, 1)), Some(Occupant::Monster(MonsterId(0))));
        level.check_invariants(player.position).unwrap();

        // Leaving puts nothing back but the item that was always there
        bump(&mut level, &mut player, Actor::Monster(MonsterId(0)), Direction::East);
        assert_eq!(level.occupant(Position::new(1, 1)), None);
        assert_eq!(level.potion_count(), 1);
        assert_eq!(player.potion_count(), 0);
    }

    #[test]
    fn test_monster_on_exit_keeps_the_exit() {
        let (mut level, mut player) = arena();
        level.move_occupant(Position::new(3, 2), Position::new(4, 2)).unwrap();

        let outcome = bump(&mut level, &mut player, Actor::Monster(MonsterId(0)), Direction::East);
        assert_eq!(outcome.kind, ActionKind::Move);
        assert_eq!(level.tile_type(Position::new(5, 2)), Some(TileType::Exit));
        assert_eq!(level.exit_count(), 1);
        assert_eq!(level.monster(MonsterId(0)).unwrap().position, Position::new(5, 2));
    }

    #[test]
    fn test_classification_is_exhaustive() {
        let (level, player) = arena();
        for direction in Direction::all() {
            let (kind, destination) = BumpAction::new(Actor::Player, direction)
                .classify(&level, &player)
                .unwrap();
            assert_eq!(destination, player.position.step(direction));
            assert!(matches!(
                kind,
                ActionKind::Move
                    | ActionKind::Attack
                    | ActionKind::Blocked
                    | ActionKind::Interact
                    | ActionKind::Exit
            ));
        }
    }
}
