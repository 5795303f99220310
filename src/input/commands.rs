//! # Command Definitions
//!
//! The commands a player can type, and the word forms they accept.

use crate::game::Direction;

/// Player input types that can be processed by the input handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// Bump in a direction
    Move(Direction),
    /// Raw discrete action index, resolved by the engine
    Action(usize),
    /// Let the autoexplore bot take over (or hand control back)
    ToggleAutoplay,
    /// Show help information
    Help,
    /// Start a new game
    NewGame,
    /// Quit the game
    Quit,
}

/// Whole-word commands.
pub fn keyword(word: &str) -> Option<PlayerInput> {
    let input = match word {
        "north" | "up" => PlayerInput::Move(Direction::North),
        "south" | "down" => PlayerInput::Move(Direction::South),
        "east" | "right" => PlayerInput::Move(Direction::East),
        "west" | "left" => PlayerInput::Move(Direction::West),
        "auto" | "autoplay" => PlayerInput::ToggleAutoplay,
        "help" | "?" => PlayerInput::Help,
        "new" | "restart" => PlayerInput::NewGame,
        "quit" | "exit" | "q" => PlayerInput::Quit,
        _ => return None,
    };
    Some(input)
}

/// Single-key movement, WASD and vi-style, plus action digits.
pub fn key(ch: char, vi_keys: bool) -> Option<PlayerInput> {
    let direction = match ch {
        'w' => Direction::North,
        's' => Direction::South,
        'a' => Direction::West,
        'd' => Direction::East,
        'k' if vi_keys => Direction::North,
        'j' if vi_keys => Direction::South,
        'h' if vi_keys => Direction::West,
        'l' if vi_keys => Direction::East,
        digit if digit.is_ascii_digit() => {
            return digit.to_digit(10).map(|index| PlayerInput::Action(index as usize));
        }
        _ => return None,
    };
    Some(PlayerInput::Move(direction))
}

pub const HELP: &str = "\
Commands:
  w a s d / h j k l   bump north, west, south, east (repeat keys: ddd)
  0 1 2 3             raw action index (east, west, south, north)
  north south east west
  auto                toggle the autoexplore bot
  new                 start a new game
  help                show this text
  quit                leave";
