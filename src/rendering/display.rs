//! # Display Management
//!
//! Plain-text rendering of the current level, a status line and a short
//! message log.

use crate::game::{Actor, Damageable, Engine, GameEvent, ItemKind, Level, Player, Position};
use crate::rendering::glyph_at;
use std::fmt::Write as _;

/// Renders the level as lines of glyph characters.
pub fn render_map(level: &Level, perfect_info: bool) -> String {
    let mut out = String::with_capacity(((level.width + 1) * level.height) as usize);
    for y in 0..level.height as i32 {
        for x in 0..level.width as i32 {
            out.push(glyph_at(level, Position::new(x, y), perfect_info).ch());
        }
        out.push('\n');
    }
    out
}

/// The `hp depth gold` status line.
pub fn status_line(player: &Player, depth: u32) -> String {
    format!(
        "HP: {}/{}  Depth: {}  Gold: {}  Potions: {}",
        player.hp(),
        player.max_hp(),
        depth,
        player.gold,
        player.potion_count()
    )
}

/// Renders the map followed by the status line.
///
/// # Examples
///
/// ```
/// use delverogue::{render_text, Engine, Player};
///
/// let engine = Engine::new(Player::new(), 7, true).unwrap();
/// let text = render_text(&engine, false);
/// assert!(text.contains('@'));
/// assert!(text.contains("Depth: 1"));
/// ```
pub fn render_text(engine: &Engine, perfect_info: bool) -> String {
    let mut out = render_map(engine.level(), perfect_info);
    out.push_str(&status_line(engine.player(), engine.depth()));
    out.push('\n');
    out
}

/// Human-readable summary of an event, or `None` for events too noisy to log.
pub fn describe_event(event: &GameEvent) -> Option<String> {
    let name = |actor: &Actor| match actor {
        Actor::Player => "you".to_string(),
        Actor::Monster(id) => format!("monster #{}", id.0),
    };

    match event {
        GameEvent::EntityMoved { .. } => None,
        GameEvent::ActionBlocked { .. } => None,
        GameEvent::EntityAttacked {
            attacker,
            defender,
            damage,
            remaining_hp,
        } => Some(format!(
            "{} hit {} for {} ({} hp left)",
            name(attacker),
            name(defender),
            damage,
            remaining_hp
        )),
        GameEvent::EntityDied { actor, .. } => Some(format!("{} died", name(actor))),
        GameEvent::ItemPickedUp { item, .. } => Some(match item {
            ItemKind::Potion => "You pick up a potion".to_string(),
            ItemKind::Gold(amount) => format!("You pick up {} gold", amount),
        }),
        GameEvent::PotionQuaffed { healed } => Some(format!("You drink a potion (+{} hp)", healed)),
        GameEvent::GoldCollected { .. } => None,
        GameEvent::ExitReached { .. } => Some("You take the stairs down".to_string()),
        GameEvent::LevelChanged { to_depth, .. } => Some(format!("Welcome to depth {}", to_depth)),
    }
}

/// Text display with a bounded message history.
#[derive(Debug, Clone)]
pub struct TextDisplay {
    /// Show every tile and monster regardless of field of view
    pub perfect_info: bool,
    /// Message history
    pub messages: Vec<String>,
    /// Maximum number of messages to keep
    pub max_messages: usize,
}

impl TextDisplay {
    pub fn new(perfect_info: bool) -> Self {
        Self {
            perfect_info,
            messages: Vec::new(),
            max_messages: 5,
        }
    }

    /// Adds a message to the message history.
    pub fn add_message(&mut self, message: String) {
        self.messages.push(message);

        // Keep only the most recent messages
        if self.messages.len() > self.max_messages {
            self.messages.remove(0);
        }
    }

    /// Logs the describable events of a tick.
    pub fn record_events(&mut self, events: &[GameEvent]) {
        for event in events {
            if let Some(message) = describe_event(event) {
                self.add_message(message);
            }
        }
    }

    /// Full frame: map, status line and recent messages.
    pub fn render(&self, engine: &Engine) -> String {
        let mut out = render_text(engine, self.perfect_info);
        for message in &self.messages {
            let _ = writeln!(out, "{}", message);
        }
        if let Some(ending) = engine.ending() {
            let _ = writeln!(out, "*** Game over: {:?} at tick {} ***", ending, engine.tick());
        }
        out
    }
}
