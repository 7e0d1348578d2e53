//! Combat math.
//!
//! Pure functions: every random outcome comes from the `rng` argument and
//! nothing here touches entities, so the session and tests share one
//! source of truth for the numbers.

use rand::Rng;

use crate::core::config::CombatConfig;
use crate::core::constants::INITIATIVE_DIE;
use crate::world::Environment;

/// Outcome of a player swing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    Miss,
    Hit { damage: i32, is_crit: bool },
}

/// Outcome of an enemy swing at the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefenseOutcome {
    /// The player sidestepped before the hit roll.
    Dodged,
    Miss,
    Hit { damage: i32, is_crit: bool },
}

/// Clamps `value` into `[min, max]` and then into `[0, 1]`. Never panics,
/// even for an inverted range.
pub fn clamp_chance(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max).clamp(0.0, 1.0)
}

/// Player hit chance after environment and skill penalties.
///
/// # Arguments
/// * `accuracy_penalty` - Subtracted from the base chance (e.g. Power Strike)
pub fn player_hit_chance(config: &CombatConfig, env: &Environment, accuracy_penalty: f64) -> f64 {
    clamp_chance(
        config.player_base_hit_chance + env.accuracy_modifier - accuracy_penalty,
        config.player_hit_chance_min,
        config.player_hit_chance_max,
    )
}

pub fn enemy_hit_chance(config: &CombatConfig, env: &Environment) -> f64 {
    clamp_chance(
        config.enemy_base_hit_chance + env.accuracy_modifier,
        config.enemy_hit_chance_min,
        config.enemy_hit_chance_max,
    )
}

/// Chance that a flee attempt succeeds.
///
/// # Arguments
/// * `pursuer_modifier` - Shift from the enemies' archetypes
pub fn flee_chance(config: &CombatConfig, env: &Environment, pursuer_modifier: f64) -> f64 {
    clamp_chance(
        config.base_flee_chance + env.flee_modifier + pursuer_modifier,
        config.flee_chance_min,
        config.flee_chance_max,
    )
}

/// `attack_power + random_in[low, high] + environment attack modifier`,
/// floored at 1.
pub fn roll_damage(attack_power: i32, config: &CombatConfig, env: &Environment, rng: &mut impl Rng) -> i32 {
    let low = config.damage_variance_low.min(config.damage_variance_high);
    let high = config.damage_variance_low.max(config.damage_variance_high);
    let variance = rng.gen_range(low..=high);
    (attack_power + variance + env.attack_modifier).max(1)
}

/// Bernoulli roll that treats non-positive chances as certain failure.
pub fn roll_chance(chance: f64, rng: &mut impl Rng) -> bool {
    chance > 0.0 && rng.gen_bool(chance.clamp(0.0, 1.0))
}

/// Scales damage, truncating toward zero but never below 1.
pub fn scale_damage(damage: i32, multiplier: f64) -> i32 {
    ((damage as f64 * multiplier.max(0.0)) as i32).max(1)
}

/// One player attack: hit roll, damage roll, then an independent crit check.
///
/// # Arguments
/// * `attack_power` - Player attack including equipment and buffs
/// * `accuracy_penalty` - Lowers the hit chance
/// * `damage_multiplier` - Applied before the crit multiplier
pub fn resolve_player_attack(
    attack_power: i32,
    accuracy_penalty: f64,
    damage_multiplier: f64,
    config: &CombatConfig,
    env: &Environment,
    rng: &mut impl Rng,
) -> AttackOutcome {
    if !rng.gen_bool(player_hit_chance(config, env, accuracy_penalty)) {
        return AttackOutcome::Miss;
    }
    let mut damage = roll_damage(attack_power, config, env, rng);
    if damage_multiplier != 1.0 {
        damage = scale_damage(damage, damage_multiplier);
    }
    let is_crit = roll_chance(config.crit_chance, rng);
    if is_crit {
        damage = scale_damage(damage, config.crit_multiplier);
    }
    AttackOutcome::Hit { damage, is_crit }
}

/// One enemy attack against the player. The dodge check comes first.
pub fn resolve_enemy_attack(
    attack_power: i32,
    damage_multiplier: f64,
    bonus_damage: i32,
    config: &CombatConfig,
    env: &Environment,
    rng: &mut impl Rng,
) -> DefenseOutcome {
    if roll_chance(config.player_dodge_chance, rng) {
        return DefenseOutcome::Dodged;
    }
    if !rng.gen_bool(enemy_hit_chance(config, env)) {
        return DefenseOutcome::Miss;
    }
    let mut damage = roll_damage(attack_power, config, env, rng);
    if damage_multiplier != 1.0 {
        damage = scale_damage(damage, damage_multiplier);
    }
    damage = (damage + bonus_damage).max(1);
    let is_crit = roll_chance(config.crit_chance, rng);
    if is_crit {
        damage = scale_damage(damage, config.crit_multiplier);
    }
    DefenseOutcome::Hit { damage, is_crit }
}

/// `d20 + bonus`.
pub fn roll_initiative(bonus: i32, rng: &mut impl Rng) -> i32 {
    rng.gen_range(1..=INITIATIVE_DIE) + bonus
}
