//! # Rendering Module
//!
//! The glyph table and the plain-text renderer built on it.

pub mod display;
pub mod glyphs;

pub use display::*;
pub use glyphs::*;
