//! Tunable balance configuration.
//!
//! Every field defaults to the matching value in [`super::constants`], so a
//! host can ship a partial JSON file that only overrides what it cares about.

use serde::{Deserialize, Serialize};

use super::constants::*;
use super::error::ConfigError;

/// Turn-resolution numbers used by [`crate::combat::CombatSession`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub player_base_hit_chance: f64,
    pub player_hit_chance_min: f64,
    pub player_hit_chance_max: f64,
    pub enemy_base_hit_chance: f64,
    pub enemy_hit_chance_min: f64,
    pub enemy_hit_chance_max: f64,
    pub player_dodge_chance: f64,
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub damage_variance_low: i32,
    pub damage_variance_high: i32,
    pub base_flee_chance: f64,
    pub flee_chance_min: f64,
    pub flee_chance_max: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            player_base_hit_chance: PLAYER_BASE_HIT_CHANCE,
            player_hit_chance_min: PLAYER_HIT_CHANCE_MIN,
            player_hit_chance_max: PLAYER_HIT_CHANCE_MAX,
            enemy_base_hit_chance: ENEMY_BASE_HIT_CHANCE,
            enemy_hit_chance_min: ENEMY_HIT_CHANCE_MIN,
            enemy_hit_chance_max: ENEMY_HIT_CHANCE_MAX,
            player_dodge_chance: PLAYER_DODGE_CHANCE,
            crit_chance: CRIT_CHANCE,
            crit_multiplier: CRIT_MULTIPLIER,
            damage_variance_low: DAMAGE_VARIANCE_LOW,
            damage_variance_high: DAMAGE_VARIANCE_HIGH,
            base_flee_chance: BASE_FLEE_CHANCE,
            flee_chance_min: FLEE_CHANCE_MIN,
            flee_chance_max: FLEE_CHANCE_MAX,
        }
    }
}

/// Tick cadence for the built-in status effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    pub poison_tick_interval: f64,
    pub bleeding_tick_interval: f64,
    /// Bleeding damages every tick but only reports health this often.
    pub bleeding_health_message_interval: f64,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            poison_tick_interval: POISON_TICK_INTERVAL_SECONDS,
            bleeding_tick_interval: BLEEDING_TICK_INTERVAL_SECONDS,
            bleeding_health_message_interval: BLEEDING_HEALTH_MESSAGE_INTERVAL_SECONDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    pub luck_coefficient: f64,
    pub level_factor_cap: f64,
    pub level_factor_floor: f64,
    pub coin_drop_chance: f64,
    pub coin_player_level_bonus: u32,
    /// Chance to also roll the generic table when an enemy has its own table.
    pub generic_table_extra_chance: f64,
    pub legendary_base_chance: f64,
    pub legendary_max_chance: f64,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            luck_coefficient: LOOT_LUCK_COEFFICIENT,
            level_factor_cap: LOOT_LEVEL_FACTOR_CAP,
            level_factor_floor: LOOT_LEVEL_FACTOR_FLOOR,
            coin_drop_chance: COIN_DROP_CHANCE,
            coin_player_level_bonus: COIN_PLAYER_LEVEL_BONUS,
            generic_table_extra_chance: GENERIC_TABLE_EXTRA_CHANCE,
            legendary_base_chance: LEGENDARY_BRANCH_BASE_CHANCE,
            legendary_max_chance: LEGENDARY_BRANCH_MAX_CHANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub active_enemy_cap: usize,
    /// Templates must overlap `[player_level, player_level + level_window]`.
    pub level_window: u32,
    pub check_interval: f64,
    pub base_chance: f64,
    pub max_chance: f64,
    pub settlement_factor: f64,
    pub bonus_modifier_threshold: f64,
    pub bonus_chance: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            active_enemy_cap: ACTIVE_ENEMY_CAP,
            level_window: SPAWN_LEVEL_WINDOW,
            check_interval: SPAWN_CHECK_INTERVAL_SECONDS,
            base_chance: SPAWN_BASE_CHANCE,
            max_chance: SPAWN_MAX_CHANCE,
            settlement_factor: SETTLEMENT_SPAWN_FACTOR,
            bonus_modifier_threshold: BONUS_SPAWN_MODIFIER_THRESHOLD,
            bonus_chance: BONUS_SPAWN_CHANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub special_attack_chance: f64,
    pub aggressive_pursuit_chance: f64,
    pub tactical_maneuver_chance: f64,
    pub berserker_max_multiplier: f64,
    pub maneuver_duration: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            special_attack_chance: SPECIAL_ATTACK_CHANCE,
            aggressive_pursuit_chance: AGGRESSIVE_PURSUIT_CHANCE,
            tactical_maneuver_chance: TACTICAL_MANEUVER_CHANCE,
            berserker_max_multiplier: BERSERKER_MAX_MULTIPLIER,
            maneuver_duration: MANEUVER_DURATION_SECONDS,
        }
    }
}

/// Top-level configuration handed to every subsystem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub combat: CombatConfig,
    pub effects: EffectConfig,
    pub loot: LootConfig,
    pub spawn: SpawnConfig,
    pub ai: AiConfig,
}

impl EngineConfig {
    /// Parses a JSON document, filling anything missing with defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects probabilities outside `[0, 1]` and inverted ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let probabilities = [
            ("combat.player_dodge_chance", self.combat.player_dodge_chance),
            ("combat.crit_chance", self.combat.crit_chance),
            ("combat.base_flee_chance", self.combat.base_flee_chance),
            ("loot.coin_drop_chance", self.loot.coin_drop_chance),
            ("loot.generic_table_extra_chance", self.loot.generic_table_extra_chance),
            ("spawn.base_chance", self.spawn.base_chance),
            ("spawn.max_chance", self.spawn.max_chance),
            ("spawn.bonus_chance", self.spawn.bonus_chance),
            ("ai.special_attack_chance", self.ai.special_attack_chance),
            ("ai.aggressive_pursuit_chance", self.ai.aggressive_pursuit_chance),
            ("ai.tactical_maneuver_chance", self.ai.tactical_maneuver_chance),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} is not a probability"),
                });
            }
        }

        let ranges = [
            (
                "combat.player_hit_chance",
                self.combat.player_hit_chance_min,
                self.combat.player_hit_chance_max,
            ),
            (
                "combat.enemy_hit_chance",
                self.combat.enemy_hit_chance_min,
                self.combat.enemy_hit_chance_max,
            ),
            (
                "combat.flee_chance",
                self.combat.flee_chance_min,
                self.combat.flee_chance_max,
            ),
        ];
        for (field, min, max) in ranges {
            if min > max || min < 0.0 || max > 1.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("range [{min}, {max}] is not a valid probability range"),
                });
            }
        }

        if self.combat.damage_variance_low > self.combat.damage_variance_high {
            return Err(ConfigError::Invalid {
                field: "combat.damage_variance",
                reason: "low bound exceeds high bound".to_string(),
            });
        }

        if self.loot.level_factor_floor < 0.0 || self.loot.level_factor_floor > self.loot.level_factor_cap {
            return Err(ConfigError::Invalid {
                field: "loot.level_factor",
                reason: "floor must be non-negative and no greater than the cap".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.combat.crit_multiplier, CRIT_MULTIPLIER);
        assert_eq!(config.spawn.active_enemy_cap, ACTIVE_ENEMY_CAP);
        assert_eq!(config.effects.poison_tick_interval, POISON_TICK_INTERVAL_SECONDS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{ "combat": { "crit_chance": 0.25 } }"#).unwrap();
        assert_eq!(config.combat.crit_chance, 0.25);
        assert_eq!(config.combat.player_dodge_chance, PLAYER_DODGE_CHANCE);
        assert_eq!(config.loot, LootConfig::default());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = EngineConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_out_of_range_probability_rejected() {
        let err = EngineConfig::from_json_str(r#"{ "spawn": { "base_chance": 1.5 } }"#)
            .unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "spawn.base_chance"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_inverted_hit_range_rejected() {
        let mut config = EngineConfig::default();
        config.combat.player_hit_chance_min = 0.99;
        config.combat.player_hit_chance_max = 0.5;
        assert!(config.validate().is_err());
    }
}
