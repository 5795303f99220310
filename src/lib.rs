//! # Delverogue
//!
//! A deterministic, turn-based dungeon crawl engine that drives both a
//! human-playable game loop and a reinforcement-learning environment.
//!
//! ## Architecture Overview
//!
//! - **Engine**: the authoritative simulation. Owns the level, the player and
//!   the RNG, and runs one tick at a time through an explicit state machine
//! - **Generation System**: seeded room-and-corridor levels with items and
//!   depth-scaled monster spawns
//! - **Action System**: directional bumps resolved into move, attack,
//!   interact, exit or blocked outcomes
//! - **Rendering**: the single glyph table used by text output and
//!   observation encoding
//! - **Environment**: a thin consumer that turns ticks into observations and
//!   rewards
//!
//! The engine never performs I/O and never consults the reward table.

pub mod env;
pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;
pub mod utils;

// Core module re-exports
pub use env::*;
pub use game::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;
pub use utils::*;

pub use game::{
    // From actions
    ActionKind,
    ActionOutcome,
    Actor,
    BumpAction,
    // From entities
    Attacker,
    Damageable,
    Direction,
    ItemKind,
    Monster,
    MonsterId,
    MonsterKind,
    Movable,
    Player,
    Position,
    // From state
    Engine,
    EngineConfig,
    Ending,
    GameEvent,
    GameStatistics,
    TickResult,
    TickStatus,
    TurnPhase,
    // From world
    Level,
    Occupant,
    Tile,
    TileType,
};

pub use generation::{GenerationConfig, Generator, Room, RoomCorridorGenerator};

/// Core error type for the Delverogue engine.
#[derive(thiserror::Error, Debug)]
pub enum RogueError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// No usable level could be produced within the attempt budget
    #[error("Generation failed at depth {depth} after {attempts} attempts: {reason}")]
    GenerationFailure {
        depth: u32,
        attempts: u32,
        reason: String,
    },

    /// Action cannot be interpreted
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// An occupant reference outlived the entity it pointed at
    #[error("Dead entity reference at {position}")]
    DeadEntityReference { position: Position },

    /// Engine state is inconsistent
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type used throughout the Delverogue codebase.
pub type RogueResult<T> = Result<T, RogueError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine configuration defaults.
pub mod config {
    /// Default level width in tiles
    pub const DEFAULT_LEVEL_WIDTH: u32 = 15;

    /// Default level height in tiles
    pub const DEFAULT_LEVEL_HEIGHT: u32 = 18;

    /// Ticks before an episode ends in a timeout
    pub const DEFAULT_MAX_TICKS: u32 = 250;

    /// Player field-of-view radius
    pub const DEFAULT_SIGHT_RADIUS: u32 = 5;

    /// Generation attempts before giving up on a depth
    pub const DEFAULT_MAX_GENERATION_ATTEMPTS: u32 = 25;

    /// Default player starting health
    pub const DEFAULT_PLAYER_HEALTH: u32 = 20;

    /// Default player attack power
    pub const DEFAULT_PLAYER_ATTACK: u32 = 2;

    /// Maximum potions the player can carry
    pub const DEFAULT_INVENTORY_CAPACITY: usize = 3;
}
