//! # Field of View
//!
//! Radius-bounded ray casting. A tile is visible when the Bresenham line from
//! the viewer reaches it without crossing a sight-blocking tile on the way.
//! The target tile itself may block sight, so walls bordering a room are seen.

use crate::game::{Level, Position};
use crate::utils::bresenham_line;
use std::collections::HashSet;

/// Computes the set of positions visible from `origin`.
///
/// Candidates lie within Euclidean distance `radius`, boundary included.
///
/// # Examples
///
/// ```
/// use delverogue::{compute_fov, Level, Position, Tile};
///
/// let mut level = Level::new(1, 5, 5);
/// level.set_tile(Position::new(2, 2), Tile::floor()).unwrap();
/// let visible = compute_fov(&level, Position::new(2, 2), 1);
/// assert!(visible.contains(&Position::new(2, 1)));
/// assert!(!visible.contains(&Position::new(1, 1)));
/// ```
pub fn compute_fov(level: &Level, origin: Position, radius: u32) -> HashSet<Position> {
    let mut visible = HashSet::new();
    if !level.is_valid_position(origin) {
        return visible;
    }

    let r = radius as i32;
    for dy in -r..=r {
        for dx in -r..=r {
            let target = Position::new(origin.x + dx, origin.y + dy);
            if !level.is_valid_position(target) {
                continue;
            }
            if origin.euclidean_distance(target) > radius as f64 {
                continue;
            }
            if has_line_of_sight(level, origin, target) {
                visible.insert(target);
            }
        }
    }

    visible
}

/// Whether nothing between `from` and `to` (exclusive) blocks sight.
pub fn has_line_of_sight(level: &Level, from: Position, to: Position) -> bool {
    let line = bresenham_line(from, to);
    let interior = line.len().saturating_sub(1);
    line.iter().take(interior).skip(1).all(|pos| {
        level
            .tile_type(*pos)
            .map(|tile_type| !tile_type.blocks_sight())
            .unwrap_or(false)
    })
}

/// Recomputes visibility on the level and marks what is seen as explored.
///
/// Tiles outside the new field of view lose `visible` but keep `explored`.
/// Returns the visible set.
pub fn refresh_visibility(level: &mut Level, origin: Position, radius: u32) -> HashSet<Position> {
    let visible = compute_fov(level, origin, radius);

    for row in &mut level.tiles {
        for tile in row {
            tile.visible = false;
        }
    }
    for pos in &visible {
        if let Some(tile) = level.get_tile_mut(*pos) {
            tile.set_visible(true);
        }
    }

    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Tile, TileType};

    fn room(width: u32, height: u32) -> Level {
        let mut level = Level::new(1, width, height);
        for y in 1..height as i32 - 1 {
            for x in 1..width as i32 - 1 {
                level.set_tile(Position::new(x, y), Tile::floor()).unwrap();
            }
        }
        level
    }

    #[test]
    fn test_radius_boundary_is_included() {
        let level = room(15, 15);
        let origin = Position::new(7, 7);
        let visible = compute_fov(&level, origin, 3);
        assert!(visible.contains(&Position::new(10, 7)));
        assert!(visible.contains(&Position::new(7, 4)));
        assert!(!visible.contains(&Position::new(11, 7)));
        // (2,2) offset is ~2.83, inside; (3,3) is ~4.24, outside
        assert!(visible.contains(&Position::new(9, 9)));
        assert!(!visible.contains(&Position::new(10, 10)));
    }

    #[test]
    fn test_walls_block_sight_but_are_seen() {
        let mut level = room(9, 3);
        level.set_tile(Position::new(4, 1), Tile::wall()).unwrap();
        let visible = compute_fov(&level, Position::new(2, 1), 6);
        assert!(visible.contains(&Position::new(3, 1)));
        assert!(visible.contains(&Position::new(4, 1)));
        assert!(!visible.contains(&Position::new(5, 1)));
        assert!(!visible.contains(&Position::new(6, 1)));
    }

    #[test]
    fn test_empty_tiles_do_not_block_sight() {
        let mut level = room(9, 3);
        level.set_tile(Position::new(4, 1), Tile::new(TileType::Empty)).unwrap();
        let visible = compute_fov(&level, Position::new(2, 1), 6);
        assert!(visible.contains(&Position::new(6, 1)));
    }

    #[test]
    fn test_explored_is_monotonic() {
        let mut level = room(20, 5);
        refresh_visibility(&mut level, Position::new(2, 2), 3);
        let explored_before: Vec<Position> = level
            .positions()
            .filter(|pos| level.get_tile(*pos).unwrap().explored)
            .collect();
        assert!(!explored_before.is_empty());

        refresh_visibility(&mut level, Position::new(16, 2), 3);
        for pos in explored_before {
            let tile = level.get_tile(pos).unwrap();
            assert!(tile.explored, "{} lost its explored flag", pos);
        }
        assert!(!level.get_tile(Position::new(2, 2)).unwrap().visible);
        assert!(level.get_tile(Position::new(16, 2)).unwrap().visible);
    }
}
