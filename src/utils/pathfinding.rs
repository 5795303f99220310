//! # Pathfinding Algorithms
//!
//! Shortest 4-directional paths over a level grid.
//!
//! Every step costs the same, so a breadth-first search from the `pathfinding`
//! crate is enough. Neighbours are expanded in N, W, E, S order, which makes
//! ties resolve the same way on every run.

use crate::game::{Level, Position, Tile};
use pathfinding::prelude::bfs;

/// Finds a monster's path from `start` to `goal`.
///
/// Walls and tiles held by any other occupant are obstacles; items and the
/// exit can be walked over. The goal is always enterable. The returned path includes both endpoints;
/// `None` means the monster should hold position.
///
/// # Examples
///
/// ```
/// use delverogue::{find_path, Level, Position, Tile};
///
/// let mut level = Level::new(1, 5, 3);
/// for x in 1..4 {
///     level.set_tile(Position::new(x, 1), Tile::floor()).unwrap();
/// }
/// let path = find_path(&level, Position::new(1, 1), Position::new(3, 1)).unwrap();
/// assert_eq!(path.len(), 3);
/// ```
pub fn find_path(level: &Level, start: Position, goal: Position) -> Option<Vec<Position>> {
    find_path_with(level, start, goal, |tile| {
        tile.tile_type.is_passable() && tile.occupant.is_none()
    })
}

/// Finds a shortest path using a caller-supplied passability rule.
///
/// `passable` is consulted for every tile except `start` and `goal`.
pub fn find_path_with<F>(
    level: &Level,
    start: Position,
    goal: Position,
    passable: F,
) -> Option<Vec<Position>>
where
    F: Fn(&Tile) -> bool,
{
    if !level.is_valid_position(start) || !level.is_valid_position(goal) {
        return None;
    }

    bfs(
        &start,
        |current: &Position| {
            current
                .cardinal_adjacent_positions()
                .into_iter()
                .filter(|next| {
                    *next == goal || level.get_tile(*next).map(&passable).unwrap_or(false)
                })
                .collect::<Vec<_>>()
        },
        |current: &Position| *current == goal,
    )
}
