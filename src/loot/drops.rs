//! Drop-table evaluation.

use std::collections::BTreeMap;

use rand::prelude::*;

use super::tables::{builtin_tables, generic_table, legendary_items};
use super::types::{LootContext, LootDrop, LootEntry, LootTable, LootTier};
use crate::core::config::LootConfig;
use crate::enemies::Enemy;
use crate::entity::Player;

/// Multiplier on a tier's drop chances from enemy strength relative to the
/// player. Common tiers always get 1.0; the rest scale with the level ratio
/// and are bounded by the configured floor and cap.
pub fn level_factor(tier: LootTier, ctx: &LootContext, config: &LootConfig) -> f64 {
    let ratio = ctx.enemy_level.max(1) as f64 / ctx.player_level.max(1) as f64;
    let factor = 1.0 + (ratio - 1.0) * tier.level_sensitivity();
    factor.max(config.level_factor_floor).min(config.level_factor_cap)
}

/// `base_chance × level_factor × (1 + luck × coefficient)`, clamped to `[0, 1]`.
pub fn modified_chance(entry: &LootEntry, tier: LootTier, ctx: &LootContext, config: &LootConfig) -> f64 {
    let luck = 1.0 + ctx.luck as f64 * config.luck_coefficient;
    (entry.base_chance * level_factor(tier, ctx, config) * luck).clamp(0.0, 1.0)
}

/// Inclusive coin range for a kill.
pub fn coin_range(ctx: &LootContext, config: &LootConfig) -> (u32, u32) {
    let low = (ctx.enemy_level + ctx.enemy_experience / 10).max(1);
    let high = low * 2 + 2;
    let bonus = ctx.player_level * config.coin_player_level_bonus;
    (low + bonus, high + bonus)
}

/// Chance of the enemy-agnostic legendary branch.
pub fn legendary_chance(ctx: &LootContext, config: &LootConfig) -> f64 {
    let strength = (ctx.enemy_level as f64 / ctx.player_level.max(1) as f64).min(1.0);
    (config.legendary_base_chance * ctx.player_level as f64 * strength)
        .min(config.legendary_max_chance)
        .clamp(0.0, 1.0)
}

pub struct LootGenerator {
    tables: BTreeMap<String, LootTable>,
    generic: LootTable,
    legendary: Vec<String>,
    config: LootConfig,
}

impl LootGenerator {
    pub fn new(
        tables: BTreeMap<String, LootTable>,
        generic: LootTable,
        legendary: Vec<String>,
        config: LootConfig,
    ) -> Self {
        Self {
            tables,
            generic,
            legendary,
            config,
        }
    }

    pub fn builtin(config: LootConfig) -> Self {
        Self::new(builtin_tables(), generic_table(), legendary_items(), config)
    }

    pub fn config(&self) -> &LootConfig {
        &self.config
    }

    pub fn table(&self, name: &str) -> Option<&LootTable> {
        self.tables.get(name)
    }

    pub fn insert_table(&mut self, name: &str, table: LootTable) {
        self.tables.insert(name.to_string(), table);
    }

    /// Rolls coins, the enemy's table (or the generic one), the occasional
    /// extra generic roll and the legendary branch.
    pub fn generate(&self, drop_table: Option<&str>, ctx: &LootContext, rng: &mut impl Rng) -> LootDrop {
        let mut drop = LootDrop::default();

        if rng.gen_bool(self.config.coin_drop_chance.clamp(0.0, 1.0)) {
            let (low, high) = coin_range(ctx, &self.config);
            drop.coins = rng.gen_range(low..=high);
        }

        let specific = drop_table.and_then(|name| {
            let table = self.tables.get(name);
            if table.is_none() {
                log::warn!("unknown drop table '{name}', using generic drops");
            }
            table
        });
        match specific {
            Some(table) => {
                self.roll_table(table, ctx, rng, &mut drop);
                if rng.gen_bool(self.config.generic_table_extra_chance.clamp(0.0, 1.0)) {
                    self.roll_table(&self.generic, ctx, rng, &mut drop);
                }
            }
            None => self.roll_table(&self.generic, ctx, rng, &mut drop),
        }

        if rng.gen_bool(legendary_chance(ctx, &self.config)) {
            if let Some(item_id) = self.legendary.choose(rng) {
                log::debug!("legendary drop: {item_id}");
                drop.add(item_id, 1);
            }
        }

        drop
    }

    /// Loot for a defeated enemy looted by `player`.
    pub fn generate_for(&self, enemy: &Enemy, player: &Player, rng: &mut impl Rng) -> LootDrop {
        let ctx = LootContext {
            enemy_level: enemy.entity.level,
            enemy_experience: enemy.experience,
            player_level: player.level(),
            luck: player.luck,
        };
        self.generate(enemy.drop_table.as_deref(), &ctx, rng)
    }

    fn roll_table(&self, table: &LootTable, ctx: &LootContext, rng: &mut impl Rng, drop: &mut LootDrop) {
        for tier in LootTier::ALL {
            for entry in table.entries(tier) {
                let chance = modified_chance(entry, tier, ctx, &self.config);
                if chance > 0.0 && rng.gen_bool(chance) {
                    let (low, high) = entry.quantity_bounds();
                    drop.add(&entry.item_id, rng.gen_range(low..=high));
                }
            }
        }
    }
}
