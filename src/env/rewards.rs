//! # Reward Table
//!
//! Reward rules are data, loaded once from JSON. Each rule names a closed
//! [`RewardCondition`] over a [`TickResult`] and the score it pays.
//!
//! ```json
//! {
//!   "rules": {
//!     "exit": { "condition": "exit_taken", "score": 50.0 },
//!     "kill_enemy": { "condition": "enemy_killed", "score": 5.0 }
//!   },
//!   "explore": 0.1
//! }
//! ```

use crate::game::{ActionKind, Ending, TickResult};
use crate::RogueResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Predicates a reward rule can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardCondition {
    ExitTaken,
    EnemyKilled,
    PotionUsed,
    ItemPickedUp,
    GoldCollected,
    DamageTaken,
    Blocked,
    PlayerDied,
    TimedOut,
}

impl RewardCondition {
    pub fn holds(self, tick: &TickResult) -> bool {
        match self {
            RewardCondition::ExitTaken => tick.exit_taken,
            RewardCondition::EnemyKilled => tick.enemies_killed > 0,
            RewardCondition::PotionUsed => tick.potion_used,
            RewardCondition::ItemPickedUp => tick.item_picked.is_some(),
            RewardCondition::GoldCollected => tick.gold_gained > 0,
            RewardCondition::DamageTaken => tick.damage_taken > 0,
            RewardCondition::Blocked => tick.action == ActionKind::Blocked,
            RewardCondition::PlayerDied => tick.ending() == Some(Ending::Death),
            RewardCondition::TimedOut => tick.ending() == Some(Ending::Timeout),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardRule {
    pub condition: RewardCondition,
    pub score: f64,
}

/// Named reward rules plus the per-tile exploration score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardTable {
    #[serde(default)]
    pub rules: BTreeMap<String, RewardRule>,
    /// Paid per newly explored floor tile, total rounded up
    #[serde(default)]
    pub explore: f64,
}

impl RewardTable {
    pub fn from_json(json: &str) -> RogueResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> RogueResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> RogueResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sum of the scores of every rule whose condition holds.
    pub fn score_tick(&self, tick: &TickResult) -> f64 {
        self.rules
            .values()
            .filter(|rule| rule.condition.holds(tick))
            .map(|rule| rule.score)
            .sum()
    }

    /// Exploration reward for `count` newly explored tiles, rounded up.
    pub fn score_exploration(&self, count: u32) -> f64 {
        if count == 0 {
            return 0.0;
        }
        (count as f64 * self.explore).ceil()
    }
}

impl Default for RewardTable {
    fn default() -> Self {
        let rule = |condition, score| RewardRule { condition, score };
        let rules = BTreeMap::from([
            ("exit".to_string(), rule(RewardCondition::ExitTaken, 50.0)),
            ("kill_enemy".to_string(), rule(RewardCondition::EnemyKilled, 5.0)),
            ("use_potion".to_string(), rule(RewardCondition::PotionUsed, 2.0)),
            ("bump_wall".to_string(), rule(RewardCondition::Blocked, -1.0)),
            ("death".to_string(), rule(RewardCondition::PlayerDied, -20.0)),
        ]);
        Self {
            rules,
            explore: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tick() -> TickResult {
        let mut tick: TickResult = serde_json::from_str(
            r#"{
                "tick": 1, "depth": 1, "action": "Blocked", "destination": null,
                "invalid_action": false, "enemies_killed": 0, "damage_dealt": 0,
                "damage_taken": 0, "item_picked": null, "potion_used": false,
                "gold_gained": 0, "exit_taken": false, "newly_explored": 0,
                "events": [], "status": "Running"
            }"#,
        )
        .unwrap();
        tick.action = ActionKind::Move;
        tick
    }

    #[test]
    fn test_parse_and_score() {
        let table = RewardTable::from_json(
            r#"{
                "rules": {
                    "exit": { "condition": "exit_taken", "score": 10.0 },
                    "hurt": { "condition": "damage_taken", "score": -1.5 }
                },
                "explore": 0.25
            }"#,
        )
        .unwrap();

        let mut tick = sample_tick();
        assert_eq!(table.score_tick(&tick), 0.0);

        tick.exit_taken = true;
        tick.damage_taken = 3;
        assert_eq!(table.score_tick(&tick), 8.5);
    }

    #[test]
    fn test_exploration_rounds_up() {
        let table = RewardTable {
            rules: BTreeMap::new(),
            explore: 0.25,
        };
        assert_eq!(table.score_exploration(0), 0.0);
        assert_eq!(table.score_exploration(1), 1.0);
        assert_eq!(table.score_exploration(4), 1.0);
        assert_eq!(table.score_exploration(5), 2.0);
    }

    #[test]
    fn test_unknown_condition_is_rejected() {
        let result = RewardTable::from_json(
            r#"{ "rules": { "x": { "condition": "teleported", "score": 1.0 } } }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_terminal_conditions() {
        let mut tick = sample_tick();
        tick.status = crate::game::TickStatus::Terminal(Ending::Timeout);
        assert!(RewardCondition::TimedOut.holds(&tick));
        assert!(!RewardCondition::PlayerDied.holds(&tick));
    }

    #[test]
    fn test_default_table_round_trips_through_json() {
        let table = RewardTable::default();
        let json = table.to_json().unwrap();
        assert_eq!(RewardTable::from_json(&json).unwrap(), table);
    }
}
