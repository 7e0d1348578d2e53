use serde::{Deserialize, Serialize};

use crate::core::events::Tone;
use crate::effects::{StatusEffectKind, StatusEffectManager};
use crate::entity::{Buff, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Weapon,
    Armor,
}

/// What happens when a consumable is used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ConsumableEffect {
    Heal { amount: i32 },
    CurePoison,
    StopBleeding,
    /// Temporary attack bonus.
    Strength { bonus: i32, duration: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub attack_bonus: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Armor {
    pub defense_bonus: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Consumable {
    pub effect: ConsumableEffect,
}

/// Item category. Behaviour is reached through the capability traits below,
/// never by comparing category names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon(Weapon),
    Armor(Armor),
    Consumable(Consumable),
    /// Crafting materials and trophies with no combat use.
    Material,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub value: u32,
}

impl Item {
    pub fn as_equippable(&self) -> Option<&dyn Equippable> {
        match &self.kind {
            ItemKind::Weapon(weapon) => Some(weapon),
            ItemKind::Armor(armor) => Some(armor),
            _ => None,
        }
    }

    pub fn as_usable(&self) -> Option<&dyn Usable> {
        match &self.kind {
            ItemKind::Consumable(consumable) => Some(consumable),
            _ => None,
        }
    }
}

/// A quantity of one item, as produced by loot rolls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_id: String,
    pub quantity: u32,
}

impl ItemStack {
    pub fn new(item_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

/// Gear that can sit in an equipment slot.
pub trait Equippable {
    fn slot(&self) -> EquipmentSlot;

    fn attack_bonus(&self) -> i32 {
        0
    }

    fn defense_bonus(&self) -> i32 {
        0
    }
}

impl Equippable for Weapon {
    fn slot(&self) -> EquipmentSlot {
        EquipmentSlot::Weapon
    }

    fn attack_bonus(&self) -> i32 {
        self.attack_bonus
    }
}

impl Equippable for Armor {
    fn slot(&self) -> EquipmentSlot {
        EquipmentSlot::Armor
    }

    fn defense_bonus(&self) -> i32 {
        self.defense_bonus
    }
}

/// Items that are spent on use.
pub trait Usable {
    /// Applies the item and returns the line to show the player.
    fn apply(
        &self,
        player: &mut Player,
        effects: &mut StatusEffectManager,
        now: f64,
    ) -> (String, Tone);
}

impl Usable for Consumable {
    fn apply(
        &self,
        player: &mut Player,
        effects: &mut StatusEffectManager,
        now: f64,
    ) -> (String, Tone) {
        match self.effect {
            ConsumableEffect::Heal { amount } => {
                let healed = player.entity.heal(amount);
                (
                    format!(
                        "You recover {} health. ({}/{})",
                        healed, player.entity.health, player.entity.max_health
                    ),
                    Tone::Success,
                )
            }
            ConsumableEffect::CurePoison => {
                if effects.remove_effect(StatusEffectKind::Poison) {
                    ("The poison leaves your body.".to_string(), Tone::Success)
                } else {
                    ("You weren't poisoned.".to_string(), Tone::Info)
                }
            }
            ConsumableEffect::StopBleeding => {
                if effects.remove_effect(StatusEffectKind::Bleeding) {
                    ("You bind your wounds.".to_string(), Tone::Success)
                } else {
                    ("You weren't bleeding.".to_string(), Tone::Info)
                }
            }
            ConsumableEffect::Strength { bonus, duration } => {
                player.entity.add_buff(Buff::new(bonus, 0, now + duration));
                (
                    format!("Strength surges through you (+{bonus} attack)."),
                    Tone::Success,
                )
            }
        }
    }
}
