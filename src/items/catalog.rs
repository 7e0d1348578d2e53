//! Built-in item definitions referenced by loot tables.

use std::collections::BTreeMap;

use super::types::{Armor, Consumable, ConsumableEffect, Item, ItemKind, Weapon};

/// Item definitions by id.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: BTreeMap<String, Item>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard item set.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for item in builtin_items() {
            catalog.insert(item);
        }
        catalog
    }

    pub fn insert(&mut self, item: Item) {
        self.items.insert(item.id.clone(), item);
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map_or(id, |item| item.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn item(id: &str, name: &str, kind: ItemKind, value: u32) -> Item {
    Item {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        value,
    }
}

fn consumable(effect: ConsumableEffect) -> ItemKind {
    ItemKind::Consumable(Consumable { effect })
}

fn weapon(attack_bonus: i32) -> ItemKind {
    ItemKind::Weapon(Weapon { attack_bonus })
}

fn armor(defense_bonus: i32) -> ItemKind {
    ItemKind::Armor(Armor { defense_bonus })
}

fn builtin_items() -> Vec<Item> {
    vec![
        // Consumables
        item(
            "minor_healing_potion",
            "Minor Healing Potion",
            consumable(ConsumableEffect::Heal { amount: 15 }),
            8,
        ),
        item(
            "healing_potion",
            "Healing Potion",
            consumable(ConsumableEffect::Heal { amount: 30 }),
            20,
        ),
        item("antidote", "Antidote", consumable(ConsumableEffect::CurePoison), 12),
        item("bandage", "Bandage", consumable(ConsumableEffect::StopBleeding), 5),
        item(
            "strength_tonic",
            "Strength Tonic",
            consumable(ConsumableEffect::Strength {
                bonus: 3,
                duration: 30.0,
            }),
            25,
        ),
        item(
            "phoenix_draught",
            "Phoenix Draught",
            consumable(ConsumableEffect::Heal { amount: 200 }),
            500,
        ),
        // Materials
        item("wolf_pelt", "Wolf Pelt", ItemKind::Material, 4),
        item("bone_fragment", "Bone Fragment", ItemKind::Material, 2),
        item("goblin_ear", "Goblin Ear", ItemKind::Material, 3),
        item("spider_silk", "Spider Silk", ItemKind::Material, 6),
        item("iron_ore", "Iron Ore", ItemKind::Material, 5),
        item("grave_dust", "Grave Dust", ItemKind::Material, 7),
        item("troll_hide", "Troll Hide", ItemKind::Material, 18),
        // Gear
        item("rusty_dagger", "Rusty Dagger", weapon(1), 6),
        item("iron_sword", "Iron Sword", weapon(3), 40),
        item("steel_sword", "Steel Sword", weapon(5), 90),
        item("leather_armor", "Leather Armor", armor(2), 35),
        item("chain_mail", "Chain Mail", armor(4), 110),
        // Legendary
        item("dawnbreaker", "Dawnbreaker", weapon(12), 2500),
        item("aegis_of_ages", "Aegis of Ages", armor(10), 2500),
    ]
}
