//! # Engine Module
//!
//! The authoritative simulation and its per-tick state machine.
//!
//! The [`Engine`] owns exactly one level, the player, the RNG and the depth
//! counter. Callers drive it one bump at a time through [`Engine::step`]; each
//! call runs a full tick to completion:
//!
//! ```text
//! AwaitingAction -> ResolvingPlayerAction -> RefreshingVisibility
//!     -> ResolvingMonsterTurns -> CheckingTermination
//!     -> AwaitingAction | TransitioningDepth | Terminal
//! ```
//!
//! `Terminal` is absorbing. Stepping a finished engine reports the ending again
//! instead of failing.

use crate::game::{
    refresh_visibility, ActionKind, ActionOutcome, Actor, BumpAction, Damageable,
    Direction, ItemKind, Level, Movable, Occupant, Player, Position,
};
use crate::generation::{utils, GenerationConfig, Generator, RoomCorridorGenerator};
use crate::utils::find_path;
use crate::{config, RogueError, RogueResult};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Tunable engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Level generation parameters
    pub generation: GenerationConfig,
    /// Player field-of-view radius
    pub sight_radius: u32,
    /// Tick count at which the episode ends in a timeout
    pub max_ticks: u32,
    /// Hit points restored by a potion
    pub potion_heal: u32,
    /// Carried potions are drunk once hp falls to this fraction of max hp
    pub quaff_threshold: f64,
    /// Verify occupant references after every tick
    pub check_invariants: bool,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            generation: GenerationConfig::default(),
            sight_radius: config::DEFAULT_SIGHT_RADIUS,
            max_ticks: config::DEFAULT_MAX_TICKS,
            potion_heal: 5,
            quaff_threshold: 1.0 / 3.0,
            check_invariants: cfg!(debug_assertions),
        }
    }

    /// Configuration for tests: invariant checks always on.
    pub fn for_testing() -> Self {
        Self {
            check_invariants: true,
            ..Self::new()
        }
    }

    /// Parses a configuration from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> RogueResult<Self> {
        serde_json::from_str(json).map_err(RogueError::from)
    }

    /// Loads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> RogueResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Phases of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    AwaitingAction,
    ResolvingPlayerAction,
    RefreshingVisibility,
    ResolvingMonsterTurns,
    CheckingTermination,
    TransitioningDepth,
    Terminal,
}

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ending {
    /// The player's hit points reached zero
    Death,
    /// The tick cap was reached with the player alive
    Timeout,
}

/// Whether the engine accepts further actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickStatus {
    Running,
    Terminal(Ending),
}

/// Things that happened during a tick, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    EntityMoved {
        actor: Actor,
        from: Position,
        to: Position,
    },
    EntityAttacked {
        attacker: Actor,
        defender: Actor,
        damage: u32,
        remaining_hp: u32,
    },
    EntityDied {
        actor: Actor,
        killer: Option<Actor>,
    },
    ActionBlocked {
        actor: Actor,
        destination: Position,
    },
    ItemPickedUp {
        item: ItemKind,
        position: Position,
    },
    PotionQuaffed {
        healed: u32,
    },
    GoldCollected {
        amount: u32,
    },
    ExitReached {
        position: Position,
    },
    LevelChanged {
        from_depth: u32,
        to_depth: u32,
    },
}

/// Structured record of one tick, read by reward predicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickResult {
    /// Tick number, starting at 1
    pub tick: u32,
    /// Depth after the tick, including any transition
    pub depth: u32,
    /// Outcome of the player's bump
    pub action: ActionKind,
    /// Tile the player's bump aimed at; `None` for an invalid action index
    pub destination: Option<Position>,
    /// The action index did not name a direction
    pub invalid_action: bool,
    pub enemies_killed: u32,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub item_picked: Option<ItemKind>,
    pub potion_used: bool,
    pub gold_gained: u32,
    pub exit_taken: bool,
    /// Explored floor tiles the consumer has not acknowledged yet
    pub newly_explored: u32,
    pub events: Vec<GameEvent>,
    pub status: TickStatus,
}

impl TickResult {
    fn new(tick: u32, depth: u32) -> Self {
        Self {
            tick,
            depth,
            action: ActionKind::Blocked,
            destination: None,
            invalid_action: false,
            enemies_killed: 0,
            damage_dealt: 0,
            damage_taken: 0,
            item_picked: None,
            potion_used: false,
            gold_gained: 0,
            exit_taken: false,
            newly_explored: 0,
            events: Vec::new(),
            status: TickStatus::Running,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, TickStatus::Terminal(_))
    }

    pub fn ending(&self) -> Option<Ending> {
        match self.status {
            TickStatus::Terminal(ending) => Some(ending),
            TickStatus::Running => None,
        }
    }

    fn record_player(&mut self, outcome: ActionOutcome) {
        self.action = outcome.kind;
        self.destination = Some(outcome.destination);
        self.exit_taken = outcome.kind == ActionKind::Exit;
        self.damage_dealt += outcome.damage_dealt;
        if outcome.killed.is_some() {
            self.enemies_killed += 1;
        }
        self.item_picked = outcome.item;
        self.potion_used |= outcome.healed > 0;
        self.gold_gained += outcome.gold_gained;
        self.events.extend(outcome.events);
    }

    fn record_monster(&mut self, outcome: ActionOutcome) {
        if outcome.kind == ActionKind::Attack {
            self.damage_taken += outcome.damage_dealt;
        }
        self.events.extend(outcome.events);
    }
}

/// Running totals across an episode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    pub enemies_defeated: u32,
    pub items_collected: u32,
    pub potions_used: u32,
    pub gold_collected: u64,
    pub exits_taken: u32,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub steps_taken: u64,
    pub max_depth_reached: u32,
}

impl GameStatistics {
    /// Creates new empty statistics.
    pub fn new() -> Self {
        Self {
            max_depth_reached: 1,
            ..Self::default()
        }
    }

    /// Updates statistics based on a game event.
    pub fn update_from_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::EntityMoved {
                actor: Actor::Player,
                ..
            } => {
                self.steps_taken += 1;
            }
            GameEvent::EntityAttacked {
                attacker, damage, ..
            } => {
                if *attacker == Actor::Player {
                    self.damage_dealt += *damage as u64;
                } else {
                    self.damage_taken += *damage as u64;
                }
            }
            GameEvent::EntityDied {
                killer: Some(Actor::Player),
                ..
            } => {
                self.enemies_defeated += 1;
            }
            GameEvent::ItemPickedUp { .. } => {
                self.items_collected += 1;
            }
            GameEvent::PotionQuaffed { .. } => {
                self.potions_used += 1;
            }
            GameEvent::GoldCollected { amount } => {
                self.gold_collected += *amount as u64;
            }
            GameEvent::ExitReached { .. } => {
                self.exits_taken += 1;
            }
            GameEvent::LevelChanged { to_depth, .. } => {
                self.max_depth_reached = self.max_depth_reached.max(*to_depth);
            }
            _ => {}
        }
    }
}

/// The simulation engine.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    generator: RoomCorridorGenerator,
    level: Level,
    player: Player,
    rng: StdRng,
    seed: u64,
    fixed_seed: bool,
    effective_seed: u64,
    depth: u32,
    tick: u32,
    phase: TurnPhase,
    ending: Option<Ending>,
    pending_transition: bool,
    visible: HashSet<Position>,
    statistics: GameStatistics,
}

impl Engine {
    /// Creates an engine with default configuration.
    ///
    /// With `fixed_seed` the level sequence is fully determined by `seed`;
    /// otherwise the RNG is seeded from the clock and `seed` is only kept for
    /// [`Engine::fresh`].
    ///
    /// # Examples
    ///
    /// ```
    /// use delverogue::{Engine, Player};
    ///
    /// let engine = Engine::new(Player::new(), 12345, true).unwrap();
    /// assert_eq!(engine.depth(), 1);
    /// assert_eq!(engine.tick(), 0);
    /// ```
    pub fn new(player: Player, seed: u64, fixed_seed: bool) -> RogueResult<Self> {
        Self::with_config(player, seed, fixed_seed, EngineConfig::default())
    }

    /// Creates an engine with explicit configuration.
    pub fn with_config(
        player: Player,
        seed: u64,
        fixed_seed: bool,
        config: EngineConfig,
    ) -> RogueResult<Self> {
        let effective_seed = utils::resolve_seed(seed, fixed_seed);
        let mut rng = utils::create_rng(effective_seed);
        let generator = RoomCorridorGenerator::new();
        let level = generator.generate(&config.generation, 1, &mut rng)?;

        info!(
            "Engine created with seed {} (fixed: {}), level {}x{}",
            effective_seed, fixed_seed, level.width, level.height
        );

        Self::assemble(config, generator, level, player, rng, seed, fixed_seed, effective_seed)
    }

    /// Creates an engine around a prebuilt level. The player is placed on the
    /// level's spawn; `seed` drives any later level generation.
    pub fn with_level(
        player: Player,
        level: Level,
        seed: u64,
        config: EngineConfig,
    ) -> RogueResult<Self> {
        let rng = utils::create_rng(seed);
        Self::assemble(
            config,
            RoomCorridorGenerator::new(),
            level,
            player,
            rng,
            seed,
            true,
            seed,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        config: EngineConfig,
        generator: RoomCorridorGenerator,
        level: Level,
        player: Player,
        rng: StdRng,
        seed: u64,
        fixed_seed: bool,
        effective_seed: u64,
    ) -> RogueResult<Self> {
        let depth = level.depth;
        let mut engine = Self {
            config,
            generator,
            level,
            player,
            rng,
            seed,
            fixed_seed,
            effective_seed,
            depth,
            tick: 0,
            phase: TurnPhase::AwaitingAction,
            ending: None,
            pending_transition: false,
            visible: HashSet::new(),
            statistics: GameStatistics::new(),
        };
        engine.statistics.max_depth_reached = depth;
        engine.place_player()?;
        engine.refresh_visibility();
        Ok(engine)
    }

    /// Builds a brand-new engine with a fresh player and the same seed policy.
    pub fn fresh(&self) -> RogueResult<Self> {
        Self::with_config(Player::new(), self.seed, self.fixed_seed, self.config.clone())
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn ending(&self) -> Option<Ending> {
        self.ending
    }

    pub fn is_terminal(&self) -> bool {
        self.ending.is_some()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn fixed_seed(&self) -> bool {
        self.fixed_seed
    }

    /// The seed actually fed to the RNG.
    pub fn effective_seed(&self) -> u64 {
        self.effective_seed
    }

    /// Positions in the player's field of view.
    pub fn visible(&self) -> &HashSet<Position> {
        &self.visible
    }

    pub fn statistics(&self) -> &GameStatistics {
        &self.statistics
    }

    /// Explored floor the consumer has not acknowledged yet.
    pub fn newly_explored_count(&self) -> u32 {
        self.level.newly_explored_count()
    }

    /// Marks the newly explored tiles as counted and returns how many there
    /// were. Only the consumer calls this; the engine never does.
    pub fn acknowledge_explored(&mut self) -> u32 {
        self.level.acknowledge_explored()
    }

    /// Runs one full tick with the given bump direction.
    pub fn step(&mut self, direction: Direction) -> RogueResult<TickResult> {
        self.run_tick(Some(direction))
    }

    /// Runs one full tick from a discrete action index. Indices that name no
    /// direction resolve as a blocked bump.
    pub fn step_index(&mut self, index: usize) -> RogueResult<TickResult> {
        let direction = Direction::from_index(index);
        if direction.is_none() {
            debug!("Action index {} is not a direction, treating as blocked", index);
        }
        self.run_tick(direction)
    }

    fn run_tick(&mut self, direction: Option<Direction>) -> RogueResult<TickResult> {
        if let Some(ending) = self.ending {
            let mut result = TickResult::new(self.tick, self.depth);
            result.status = TickStatus::Terminal(ending);
            result.newly_explored = self.level.newly_explored_count();
            return Ok(result);
        }

        self.tick += 1;
        let mut result = TickResult::new(self.tick, self.depth);

        self.phase = TurnPhase::ResolvingPlayerAction;
        match direction {
            Some(direction) => {
                let outcome = BumpAction::new(Actor::Player, direction).execute(
                    &mut self.level,
                    &mut self.player,
                    &self.config,
                )?;
                if outcome.kind == ActionKind::Exit {
                    self.pending_transition = true;
                }
                result.record_player(outcome);
            }
            None => {
                result.invalid_action = true;
            }
        }

        self.phase = TurnPhase::RefreshingVisibility;
        self.refresh_visibility();

        self.phase = TurnPhase::ResolvingMonsterTurns;
        self.run_monster_turns(&mut result)?;

        self.phase = TurnPhase::CheckingTermination;
        self.quaff_if_needed(&mut result);

        if self.player.is_dead() {
            self.ending = Some(Ending::Death);
        } else if self.tick >= self.config.max_ticks {
            self.ending = Some(Ending::Timeout);
        }

        if let Some(ending) = self.ending {
            self.phase = TurnPhase::Terminal;
            self.pending_transition = false;
            result.status = TickStatus::Terminal(ending);
            info!(
                "Episode ended by {:?} at tick {} on depth {}",
                ending, self.tick, self.depth
            );
        } else if self.pending_transition {
            self.phase = TurnPhase::TransitioningDepth;
            let transition = self.descend(&mut result);
            self.pending_transition = false;
            self.phase = TurnPhase::AwaitingAction;
            if let Err(e) = transition {
                // The player stays on the old level; the tick still counts
                self.record_statistics(&result);
                warn!("Depth transition from {} failed: {}", self.depth, e);
                return Err(e);
            }
        } else {
            self.phase = TurnPhase::AwaitingAction;
        }

        result.depth = self.depth;
        result.newly_explored = self.level.newly_explored_count();
        self.record_statistics(&result);

        if self.config.check_invariants {
            self.level.check_invariants(self.player.position())?;
        }

        Ok(result)
    }

    fn record_statistics(&mut self, result: &TickResult) {
        for event in &result.events {
            self.statistics.update_from_event(event);
        }
    }

    /// Lets every live monster, in spawn order, take one step or swing.
    fn run_monster_turns(&mut self, result: &mut TickResult) -> RogueResult<()> {
        for id in self.level.monster_ids() {
            if self.player.is_dead() {
                break;
            }
            // Killed earlier in this tick
            let Some(position) = self.level.monster(id).map(|monster| monster.position()) else {
                continue;
            };

            let Some(direction) = self.next_step_towards_player(position) else {
                continue;
            };
            let outcome = BumpAction::new(Actor::Monster(id), direction).execute(
                &mut self.level,
                &mut self.player,
                &self.config,
            )?;
            result.record_monster(outcome);
        }
        Ok(())
    }

    fn next_step_towards_player(&self, from: Position) -> Option<Direction> {
        let path = find_path(&self.level, from, self.player.position())?;
        let next = path.get(1)?;
        Direction::from_delta(*next - from)
    }

    /// Drinks a carried potion when health runs low.
    fn quaff_if_needed(&mut self, result: &mut TickResult) {
        if self.player.is_dead() {
            return;
        }
        let threshold = (self.player.max_hp() as f64 * self.config.quaff_threshold) as u32;
        if self.player.hp() > threshold || !self.player.take_potion() {
            return;
        }
        let healed = self.player.heal(self.config.potion_heal);
        result.potion_used = true;
        result.events.push(GameEvent::PotionQuaffed { healed });
        debug!("Player drank a carried potion, healed {}", healed);
    }

    /// Replaces the level with a freshly generated one, one depth deeper.
    fn descend(&mut self, result: &mut TickResult) -> RogueResult<()> {
        let from_depth = self.depth;
        let to_depth = from_depth + 1;

        let level = self
            .generator
            .generate(&self.config.generation, to_depth, &mut self.rng)?;
        self.level = level;
        self.depth = to_depth;
        self.place_player()?;
        self.refresh_visibility();

        result.events.push(GameEvent::LevelChanged {
            from_depth,
            to_depth,
        });
        info!(
            "Descended to depth {} (hp {}, gold {})",
            to_depth, self.player.hp, self.player.gold
        );
        Ok(())
    }

    /// Puts the player on the current level's spawn tile.
    fn place_player(&mut self) -> RogueResult<()> {
        let spawn = self.level.player_spawn;
        let tile = self
            .level
            .get_tile_mut(spawn)
            .ok_or_else(|| RogueError::InvalidState(format!("Spawn {} out of bounds", spawn)))?;
        if !tile.tile_type.is_passable() {
            return Err(RogueError::InvalidState(format!(
                "Spawn {} is not walkable",
                spawn
            )));
        }
        if matches!(tile.occupant, Some(Occupant::Monster(_))) {
            return Err(RogueError::InvalidState(format!(
                "Spawn {} is occupied by a monster",
                spawn
            )));
        }
        tile.occupant = Some(Occupant::Player);
        self.player.set_position(spawn);
        Ok(())
    }

    fn refresh_visibility(&mut self) {
        self.visible = refresh_visibility(
            &mut self.level,
            self.player.position(),
            self.config.sight_radius,
        );
    }
}
