use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::{EquipmentSlot, Item, ItemStack};

/// Player equipment slots.
///
/// IMPORTANT: When adding new slots, use `#[serde(default)]` so records
/// written before the slot existed still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> &Option<Item> {
        match slot {
            EquipmentSlot::Weapon => &self.weapon,
            EquipmentSlot::Armor => &self.armor,
        }
    }

    /// Puts `item` in its slot and hands back whatever was there.
    /// Items without an equipment slot are returned untouched.
    pub fn equip(&mut self, item: Item) -> Result<Option<Item>, Item> {
        let slot = match item.as_equippable() {
            Some(gear) => gear.slot(),
            None => return Err(item),
        };
        let previous = match slot {
            EquipmentSlot::Weapon => self.weapon.replace(item),
            EquipmentSlot::Armor => self.armor.replace(item),
        };
        Ok(previous)
    }

    pub fn iter_equipped(&self) -> impl Iterator<Item = &Item> {
        [&self.weapon, &self.armor]
            .into_iter()
            .filter_map(|item| item.as_ref())
    }

    pub fn attack_bonus(&self) -> i32 {
        self.iter_equipped()
            .filter_map(Item::as_equippable)
            .map(|gear| gear.attack_bonus())
            .sum()
    }

    pub fn defense_bonus(&self) -> i32 {
        self.iter_equipped()
            .filter_map(Item::as_equippable)
            .map(|gear| gear.defense_bonus())
            .sum()
    }
}

/// Carried items by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    items: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item_id: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        *self.items.entry(item_id.to_string()).or_insert(0) += quantity;
    }

    pub fn add_stack(&mut self, stack: &ItemStack) {
        self.add(&stack.item_id, stack.quantity);
    }

    /// Removes up to `quantity` and returns how many were actually removed.
    pub fn remove(&mut self, item_id: &str, quantity: u32) -> u32 {
        let Some(held) = self.items.get_mut(item_id) else {
            return 0;
        };
        let removed = quantity.min(*held);
        *held -= removed;
        if *held == 0 {
            self.items.remove(item_id);
        }
        removed
    }

    pub fn count(&self, item_id: &str) -> u32 {
        self.items.get(item_id).copied().unwrap_or(0)
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.count(item_id) > 0
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(id, qty)| (id.as_str(), *qty))
    }
}
