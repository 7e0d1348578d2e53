use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::items::ItemStack;

/// Rarity bucket within a loot table. Each tier is rolled independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LootTier {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl LootTier {
    pub const ALL: [LootTier; 4] = [
        LootTier::Common,
        LootTier::Uncommon,
        LootTier::Rare,
        LootTier::Legendary,
    ];

    /// How strongly enemy strength moves this tier's drop rates.
    /// Common drops ignore it entirely.
    pub fn level_sensitivity(&self) -> f64 {
        match self {
            LootTier::Common => 0.0,
            LootTier::Uncommon => 0.5,
            LootTier::Rare | LootTier::Legendary => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item_id: String,
    pub min_qty: u32,
    pub max_qty: u32,
    /// Chance in `[0, 1]` before modifiers.
    pub base_chance: f64,
}

impl LootEntry {
    pub fn new(item_id: &str, min_qty: u32, max_qty: u32, base_chance: f64) -> Self {
        Self {
            item_id: item_id.to_string(),
            min_qty,
            max_qty,
            base_chance: base_chance.clamp(0.0, 1.0),
        }
    }

    /// Inclusive quantity bounds with the ends in order.
    pub fn quantity_bounds(&self) -> (u32, u32) {
        (self.min_qty.min(self.max_qty), self.min_qty.max(self.max_qty))
    }
}

/// Per-tier drop lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    pub tiers: BTreeMap<LootTier, Vec<LootEntry>>,
}

impl LootTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, tier: LootTier, entry: LootEntry) -> Self {
        self.tiers.entry(tier).or_default().push(entry);
        self
    }

    pub fn entries(&self, tier: LootTier) -> &[LootEntry] {
        self.tiers.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.values().all(Vec::is_empty)
    }
}

/// Who died and who is looting, as far as drop rates care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LootContext {
    pub enemy_level: u32,
    pub enemy_experience: u32,
    pub player_level: u32,
    pub luck: i32,
}

/// Everything one defeated enemy left behind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LootDrop {
    pub coins: u32,
    pub items: Vec<ItemStack>,
}

impl LootDrop {
    /// Adds a stack, merging with an existing stack of the same item.
    pub fn add(&mut self, item_id: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.items.iter_mut().find(|s| s.item_id == item_id) {
            Some(stack) => stack.quantity += quantity,
            None => self.items.push(ItemStack::new(item_id, quantity)),
        }
    }

    pub fn quantity_of(&self, item_id: &str) -> u32 {
        self.items
            .iter()
            .filter(|s| s.item_id == item_id)
            .map(|s| s.quantity)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.coins == 0 && self.items.is_empty()
    }
}
