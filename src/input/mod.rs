//! # Input Module
//!
//! Line-oriented command parsing for the terminal game loop.

pub mod commands;

pub use commands::*;

use crate::{RogueError, RogueResult};

/// Input handler for processing player commands.
///
/// Turns one line of text into the inputs it stands for.
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Whether to enable Vi-style movement keys (hjkl)
    pub vi_keys_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use delverogue::{Direction, InputHandler, PlayerInput};
    ///
    /// let handler = InputHandler::new();
    /// let inputs = handler.parse_line("dd").unwrap();
    /// assert_eq!(inputs, vec![PlayerInput::Move(Direction::East); 2]);
    /// ```
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: true,
        }
    }

    /// Parses a line. A whole-word command yields one input; otherwise every
    /// character must be a movement key or an action digit. Blank lines yield
    /// nothing.
    pub fn parse_line(&self, line: &str) -> RogueResult<Vec<PlayerInput>> {
        let line = line.trim().to_ascii_lowercase();
        if line.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(input) = keyword(&line) {
            return Ok(vec![input]);
        }

        line.chars()
            .filter(|ch| !ch.is_whitespace())
            .map(|ch| {
                key(ch, self.vi_keys_enabled).ok_or_else(|| {
                    RogueError::InvalidAction(format!("Unknown command '{}' in \"{}\"", ch, line))
                })
            })
            .collect()
    }
}
