//! # Environment Module
//!
//! A reinforcement-learning style wrapper around the [`Engine`].
//!
//! The environment is a consumer: it feeds discrete actions in, turns each
//! [`TickResult`] into a reward through a [`RewardTable`], encodes an
//! [`Observation`] and keeps per-episode counters. It is also the only code
//! that acknowledges newly explored tiles.

pub mod observation;
pub mod rewards;

pub use observation::*;
pub use rewards::*;

use crate::game::{Damageable, Engine, EngineConfig, Player, TickResult};
use crate::RogueResult;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Number of discrete actions: east, west, south, north.
pub const ACTION_COUNT: usize = 4;

/// Episode setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    pub seed: u64,
    /// Reuse `seed` for every episode instead of the clock
    pub fixed_seed: bool,
    /// Observe the whole level rather than only explored tiles
    pub perfect_info: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            fixed_seed: false,
            perfect_info: true,
        }
    }
}

/// Counters for the current episode, also used as the step info.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeInfo {
    pub ticks: u32,
    pub exits_taken: u32,
    pub enemies_killed: u32,
    pub potions_taken: u32,
    /// Monsters alive on the current level
    pub enemies_on_map: usize,
    /// Potions lying on the current level
    pub potions_on_map: usize,
    pub player_hp: u32,
    pub gold: u32,
    pub depth: u32,
}

/// Result of one environment step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    pub info: EpisodeInfo,
    pub tick: TickResult,
}

/// The environment.
#[derive(Debug, Clone)]
pub struct RogueEnv {
    config: EnvConfig,
    engine_config: EngineConfig,
    rewards: RewardTable,
    player_factory: fn() -> Player,
    engine: Engine,
    episode: EpisodeInfo,
    done: bool,
}

impl RogueEnv {
    /// Creates an environment with default engine settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use delverogue::{EnvConfig, RewardTable, RogueEnv};
    ///
    /// let config = EnvConfig { seed: 12345, fixed_seed: true, perfect_info: false };
    /// let mut env = RogueEnv::new(config, RewardTable::default()).unwrap();
    /// let outcome = env.step(0).unwrap();
    /// assert_eq!(outcome.info.ticks, 1);
    /// ```
    pub fn new(config: EnvConfig, rewards: RewardTable) -> RogueResult<Self> {
        Self::with_engine_config(config, rewards, EngineConfig::default())
    }

    pub fn with_engine_config(
        config: EnvConfig,
        rewards: RewardTable,
        engine_config: EngineConfig,
    ) -> RogueResult<Self> {
        let player_factory: fn() -> Player = Player::new;
        let engine = Self::build_engine(&config, &engine_config, player_factory)?;
        let mut env = Self {
            config,
            engine_config,
            rewards,
            player_factory,
            engine,
            episode: EpisodeInfo::default(),
            done: false,
        };
        env.begin_episode();
        Ok(env)
    }

    /// Replaces the factory used to build the player on every reset.
    pub fn with_player_factory(mut self, factory: fn() -> Player) -> RogueResult<Self> {
        self.player_factory = factory;
        self.reset()?;
        Ok(self)
    }

    fn build_engine(
        config: &EnvConfig,
        engine_config: &EngineConfig,
        player_factory: fn() -> Player,
    ) -> RogueResult<Engine> {
        Engine::with_config(
            player_factory(),
            config.seed,
            config.fixed_seed,
            engine_config.clone(),
        )
    }

    /// Starts counting a fresh episode. What the player sees from the spawn
    /// is acknowledged without reward.
    fn begin_episode(&mut self) {
        self.engine.acknowledge_explored();
        self.episode = EpisodeInfo::default();
        self.done = false;
        self.refresh_info();
    }

    /// Uses `seed` for every following episode.
    pub fn set_seed(&mut self, seed: u64) {
        self.config.seed = seed;
        self.config.fixed_seed = true;
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn rewards(&self) -> &RewardTable {
        &self.rewards
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn info(&self) -> &EpisodeInfo {
        &self.episode
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn observation(&self) -> Observation {
        Observation::capture(&self.engine, self.config.perfect_info)
    }

    /// Starts a new episode with a fresh engine and player.
    pub fn reset(&mut self) -> RogueResult<Observation> {
        self.engine = Self::build_engine(&self.config, &self.engine_config, self.player_factory)?;
        self.begin_episode();
        debug!("Environment reset (seed {})", self.engine.effective_seed());
        Ok(self.observation())
    }

    /// Advances one tick with a discrete action index.
    ///
    /// Once the episode is done, further steps pay nothing and change nothing.
    pub fn step(&mut self, action: usize) -> RogueResult<StepOutcome> {
        let tick = self.engine.step_index(action)?;

        if self.done {
            return Ok(StepOutcome {
                observation: self.observation(),
                reward: 0.0,
                done: true,
                info: self.episode.clone(),
                tick,
            });
        }

        let mut reward = self.rewards.score_tick(&tick);
        let explored = self.engine.acknowledge_explored();
        reward += self.rewards.score_exploration(explored);

        self.episode.ticks += 1;
        self.episode.enemies_killed += tick.enemies_killed;
        if tick.exit_taken {
            self.episode.exits_taken += 1;
        }
        if tick.potion_used {
            self.episode.potions_taken += 1;
        }
        self.refresh_info();

        self.done = tick.is_terminal();
        if self.done {
            info!(
                "Episode finished after {} ticks: {} exits, {} kills",
                self.episode.ticks, self.episode.exits_taken, self.episode.enemies_killed
            );
        }

        Ok(StepOutcome {
            observation: self.observation(),
            reward,
            done: self.done,
            info: self.episode.clone(),
            tick,
        })
    }

    fn refresh_info(&mut self) {
        let level = self.engine.level();
        self.episode.enemies_on_map = level.monsters.len();
        self.episode.potions_on_map = level.potion_count();
        self.episode.player_hp = self.engine.player().hp();
        self.episode.gold = self.engine.player().gold;
        self.episode.depth = self.engine.depth();
    }
}
