//! # Grid Mathematics
//!
//! Line rasterisation used by line-of-sight checks.

use crate::game::Position;

/// Returns the cells of the Bresenham line from `from` to `to`, inclusive of
/// both endpoints.
///
/// # Examples
///
/// ```
/// use delverogue::{bresenham_line, Position};
///
/// let line = bresenham_line(Position::new(0, 0), Position::new(3, 0));
/// assert_eq!(line.len(), 4);
/// assert_eq!(line[3], Position::new(3, 0));
/// ```
pub fn bresenham_line(from: Position, to: Position) -> Vec<Position> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };

    let mut err = dx + dy;
    let mut current = from;
    let mut line = Vec::with_capacity((dx - dy) as usize + 1);

    loop {
        line.push(current);
        if current == to {
            break;
        }
        let doubled = 2 * err;
        if doubled >= dy {
            err += dy;
            current.x += sx;
        }
        if doubled <= dx {
            err += dx;
            current.y += sy;
        }
    }

    line
}
