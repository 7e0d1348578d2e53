//! Built-in loot tables.

use std::collections::BTreeMap;

use super::types::{LootEntry, LootTable, LootTier};

/// Enemy-specific tables keyed by the name an enemy's `drop_table` refers to.
pub fn builtin_tables() -> BTreeMap<String, LootTable> {
    use LootTier::*;

    let mut tables = BTreeMap::new();
    tables.insert(
        "wolf".to_string(),
        LootTable::new()
            .with_entry(Common, LootEntry::new("wolf_pelt", 1, 2, 0.6))
            .with_entry(Uncommon, LootEntry::new("bone_fragment", 1, 3, 0.25)),
    );
    tables.insert(
        "goblin".to_string(),
        LootTable::new()
            .with_entry(Common, LootEntry::new("goblin_ear", 1, 1, 0.7))
            .with_entry(Uncommon, LootEntry::new("rusty_dagger", 1, 1, 0.15))
            .with_entry(Uncommon, LootEntry::new("minor_healing_potion", 1, 1, 0.2))
            .with_entry(Rare, LootEntry::new("leather_armor", 1, 1, 0.04)),
    );
    tables.insert(
        "spider".to_string(),
        LootTable::new()
            .with_entry(Common, LootEntry::new("spider_silk", 1, 3, 0.65))
            .with_entry(Uncommon, LootEntry::new("antidote", 1, 1, 0.3)),
    );
    tables.insert(
        "bandit".to_string(),
        LootTable::new()
            .with_entry(Common, LootEntry::new("bandage", 1, 2, 0.4))
            .with_entry(Uncommon, LootEntry::new("healing_potion", 1, 1, 0.15))
            .with_entry(Rare, LootEntry::new("iron_sword", 1, 1, 0.05))
            .with_entry(Rare, LootEntry::new("leather_armor", 1, 1, 0.05)),
    );
    tables.insert(
        "skeleton".to_string(),
        LootTable::new()
            .with_entry(Common, LootEntry::new("bone_fragment", 1, 4, 0.8))
            .with_entry(Uncommon, LootEntry::new("grave_dust", 1, 2, 0.3))
            .with_entry(Rare, LootEntry::new("chain_mail", 1, 1, 0.03)),
    );
    tables.insert(
        "troll".to_string(),
        LootTable::new()
            .with_entry(Common, LootEntry::new("troll_hide", 1, 1, 0.75))
            .with_entry(Uncommon, LootEntry::new("iron_ore", 2, 5, 0.4))
            .with_entry(Rare, LootEntry::new("steel_sword", 1, 1, 0.08))
            .with_entry(Legendary, LootEntry::new("phoenix_draught", 1, 1, 0.01)),
    );
    tables
}

/// Used when an enemy has no table of its own, and rolled now and then on
/// top of one that does.
pub fn generic_table() -> LootTable {
    LootTable::new()
        .with_entry(LootTier::Common, LootEntry::new("minor_healing_potion", 1, 1, 0.15))
        .with_entry(LootTier::Common, LootEntry::new("bandage", 1, 1, 0.12))
        .with_entry(LootTier::Uncommon, LootEntry::new("healing_potion", 1, 1, 0.06))
        .with_entry(LootTier::Uncommon, LootEntry::new("antidote", 1, 1, 0.06))
        .with_entry(LootTier::Uncommon, LootEntry::new("iron_ore", 1, 2, 0.08))
        .with_entry(LootTier::Rare, LootEntry::new("strength_tonic", 1, 1, 0.02))
}

/// Items the enemy-agnostic legendary branch can award.
pub fn legendary_items() -> Vec<String> {
    vec!["dawnbreaker".to_string(), "aegis_of_ages".to_string()]
}
