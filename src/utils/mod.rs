//! # Utilities Module
//!
//! Grid geometry and pathfinding helpers shared by the engine and generators.

pub mod math;
pub mod pathfinding;

pub use self::math::*;
pub use self::pathfinding::*;
