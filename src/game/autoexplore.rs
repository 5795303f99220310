//! # Autoexplore Module
//!
//! A simple bot that walks the player to the exit, fighting whatever stands
//! in the way. Drives the CLI's autoplay mode and the end-to-end tests.

use crate::game::{Direction, Engine, Level, Occupant, Position};
use crate::utils::find_path_with;

/// Autoexplore state.
#[derive(Debug, Clone, Default)]
pub struct AutoexploreState {
    /// Whether autoexplore is currently enabled
    pub enabled: bool,
    /// Last path computed towards the target, player position first
    pub current_path: Vec<Position>,
    /// Current target position
    pub target: Option<Position>,
}

impl AutoexploreState {
    /// Creates a new, enabled autoexplore state.
    pub fn new() -> Self {
        Self {
            enabled: true,
            current_path: Vec::new(),
            target: None,
        }
    }

    /// Toggles autoexplore on/off.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        if !self.enabled {
            self.current_path.clear();
            self.target = None;
        }
        self.enabled
    }

    /// Picks the player's next bump.
    ///
    /// Walks the shortest monster-free path to the exit. When monsters block
    /// every such path, it heads through them and attacks the one in front.
    /// With no route at all it bumps the first wall next to the player, which
    /// leaves the player in place. Returns `None` when disabled or when the
    /// episode is over.
    pub fn next_direction(&mut self, engine: &Engine) -> Option<Direction> {
        if !self.enabled || engine.is_terminal() {
            return None;
        }

        let level = engine.level();
        let origin = engine.player().position;
        self.target = level.exit_position;

        let path = self.target.and_then(|exit| {
            find_path_with(level, origin, exit, |tile| {
                tile.tile_type.is_passable() && tile.occupant.is_none()
            })
            .or_else(|| find_path_with(level, origin, exit, |tile| tile.tile_type.is_passable()))
        });

        match path {
            Some(path) if path.len() >= 2 => {
                let step = Direction::from_delta(path[1] - origin);
                self.current_path = path;
                step.or_else(|| Some(Self::hold(level, origin)))
            }
            _ => {
                self.current_path.clear();
                Some(Self::adjacent_monster(level, origin).unwrap_or_else(|| Self::hold(level, origin)))
            }
        }
    }

    fn adjacent_monster(level: &Level, origin: Position) -> Option<Direction> {
        Direction::all()
            .into_iter()
            .find(|direction| matches!(level.occupant(origin.step(*direction)), Some(Occupant::Monster(_))))
    }

    /// A bump that does not move the player.
    fn hold(level: &Level, origin: Position) -> Direction {
        Direction::all()
            .into_iter()
            .find(|direction| {
                !level
                    .tile_type(origin.step(*direction))
                    .map(|tile_type| tile_type.is_passable())
                    .unwrap_or(false)
            })
            .unwrap_or(Direction::East)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        ActionKind, EngineConfig, Monster, MonsterId, MonsterKind, Player, Tile, TileType,
    };

    fn corridor() -> Level {
        let mut level = Level::new(1, 9, 3);
        for x in 1..8 {
            level.set_tile(Position::new(x, 1), Tile::floor()).unwrap();
        }
        level.set_tile(Position::new(7, 1), Tile::new(TileType::Exit)).unwrap();
        level.exit_position = Some(Position::new(7, 1));
        level.player_spawn = Position::new(1, 1);
        level
    }

    #[test]
    fn test_walks_towards_exit() {
        let engine = Engine::with_level(Player::new(), corridor(), 1, EngineConfig::for_testing()).unwrap();
        let mut bot = AutoexploreState::new();
        assert_eq!(bot.next_direction(&engine), Some(Direction::East));
        assert_eq!(bot.target, Some(Position::new(7, 1)));
        assert_eq!(bot.current_path.len(), 7);
    }

    #[test]
    fn test_attacks_blocking_monster() {
        let mut level = corridor();
        level
            .add_monster(Monster::new(MonsterId(0), MonsterKind::Zombie, Position::new(2, 1), 1, 0))
            .unwrap();
        let mut engine = Engine::with_level(Player::new(), level, 1, EngineConfig::for_testing()).unwrap();
        let mut bot = AutoexploreState::new();

        let direction = bot.next_direction(&engine).unwrap();
        assert_eq!(direction, Direction::East);
        let result = engine.step(direction).unwrap();
        assert_eq!(result.action, ActionKind::Attack);
    }

    #[test]
    fn test_reaches_exit() {
        let mut engine = Engine::with_level(Player::new(), corridor(), 1, EngineConfig::for_testing()).unwrap();
        let mut bot = AutoexploreState::new();

        for _ in 0..10 {
            let direction = bot.next_direction(&engine).unwrap();
            if engine.step(direction).unwrap().exit_taken {
                break;
            }
        }
        assert_eq!(engine.depth(), 2);
    }

    #[test]
    fn test_disabled_bot_does_nothing() {
        let engine = Engine::with_level(Player::new(), corridor(), 1, EngineConfig::for_testing()).unwrap();
        let mut bot = AutoexploreState::new();
        assert!(!bot.toggle());
        assert_eq!(bot.next_direction(&engine), None);
    }
}
