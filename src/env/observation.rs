//! # Observations
//!
//! Integer grid view of the engine for learning agents.

use crate::game::{Damageable, Engine, Position};
use crate::rendering::glyph_at;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A `(height + 1) x width` grid of glyph codes.
///
/// Rows `0..height` mirror the level. The final row starts with the player's
/// hp, the depth and the gold, padded with zeros.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub width: usize,
    pub rows: usize,
    pub cells: Vec<i32>,
}

impl Observation {
    /// Encodes what the player knows of the engine's current level.
    ///
    /// # Examples
    ///
    /// ```
    /// use delverogue::{Engine, Observation, Player};
    ///
    /// let engine = Engine::new(Player::new(), 3, true).unwrap();
    /// let obs = Observation::capture(&engine, true);
    /// assert_eq!(obs.rows, engine.level().height as usize + 1);
    /// assert_eq!(obs.get(0, obs.rows - 1), Some(20));
    /// ```
    pub fn capture(engine: &Engine, perfect_info: bool) -> Self {
        let level = engine.level();
        let width = level.width as usize;
        let rows = level.height as usize + 1;
        let mut cells = vec![0; width * rows];

        for pos in level.positions() {
            let index = pos.y as usize * width + pos.x as usize;
            cells[index] = glyph_at(level, pos, perfect_info).code();
        }

        let status = [
            engine.player().hp() as i32,
            engine.depth() as i32,
            engine.player().gold as i32,
        ];
        let footer = (rows - 1) * width;
        for (offset, value) in status.iter().enumerate().take(width) {
            cells[footer + offset] = *value;
        }

        Self { width, rows, cells }
    }

    /// Cell at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Option<i32> {
        if x >= self.width || y >= self.rows {
            return None;
        }
        self.cells.get(y * self.width + x).copied()
    }

    /// Code shown for a level position.
    pub fn at(&self, pos: Position) -> Option<i32> {
        if pos.x < 0 || pos.y < 0 || pos.y as usize + 1 >= self.rows {
            return None;
        }
        self.get(pos.x as usize, pos.y as usize)
    }

    /// Iterates over rows.
    pub fn row_slices(&self) -> impl Iterator<Item = &[i32]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Nested rows, the shape most consumers want.
    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        self.row_slices().map(<[i32]>::to_vec).collect()
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.row_slices() {
            let line: Vec<String> = row.iter().map(|code| format!("{:>3}", code)).collect();
            writeln!(f, "{}", line.join(""))?;
        }
        Ok(())
    }
}
