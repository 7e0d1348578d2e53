use serde::{Deserialize, Serialize};

use super::types::{Combatant, Entity, EntityTag};
use crate::core::constants::{
    LEVEL_UP_ATTACK, LEVEL_UP_DEFENSE, LEVEL_UP_HEALTH, XP_CURVE_BASE, XP_CURVE_EXPONENT,
};
use crate::items::{Equipment, Inventory};

/// Experience needed to go from `level` to `level + 1`. Level 0 is costed
/// as level 1.
pub fn xp_for_next_level(level: u32) -> u64 {
    (XP_CURVE_BASE * f64::powf(level.max(1) as f64, XP_CURVE_EXPONENT)) as u64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub entity: Entity,
    pub experience: u64,
    /// Feeds loot chance modifiers.
    #[serde(default)]
    pub luck: i32,
    #[serde(default)]
    pub initiative_bonus: i32,
    pub current_room: String,
    #[serde(default)]
    pub coins: u32,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub equipment: Equipment,
}

impl Player {
    pub fn new(name: impl Into<String>, start_room: impl Into<String>) -> Self {
        Self {
            entity: Entity::new(name, 50, 8, 2).with_tag(EntityTag::Player),
            experience: 0,
            luck: 0,
            initiative_bonus: 0,
            current_room: start_room.into(),
            coins: 0,
            inventory: Inventory::new(),
            equipment: Equipment::new(),
        }
    }

    pub fn level(&self) -> u32 {
        self.entity.level
    }

    /// Adds experience and applies any level-ups. Returns the number of
    /// levels gained.
    pub fn gain_experience(&mut self, amount: u64) -> u32 {
        self.experience = self.experience.saturating_add(amount);
        let mut levels = 0;
        loop {
            let needed = xp_for_next_level(self.entity.level);
            if self.experience < needed {
                break;
            }
            self.experience -= needed;
            self.entity.level += 1;
            self.entity.max_health += LEVEL_UP_HEALTH;
            self.entity.attack += LEVEL_UP_ATTACK;
            self.entity.defense += LEVEL_UP_DEFENSE;
            self.entity.health = self.entity.max_health;
            levels += 1;
        }
        levels
    }
}

impl Combatant for Player {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn attack_power(&self, now: f64) -> i32 {
        (self.entity.attack_power(now) + self.equipment.attack_bonus()).max(0)
    }

    fn defense_power(&self, now: f64) -> i32 {
        (self.entity.defense_power(now) + self.equipment.defense_bonus()).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ItemCatalog;

    #[test]
    fn test_xp_curve() {
        assert_eq!(xp_for_next_level(1), 100);
        assert_eq!(xp_for_next_level(4), 800);
    }

    #[test]
    fn test_gain_experience_levels_up() {
        let mut player = Player::new("Hero", "square");
        player.entity.lose_health(20);
        let levels = player.gain_experience(150);
        assert_eq!(levels, 1);
        assert_eq!(player.level(), 2);
        assert_eq!(player.experience, 50);
        assert_eq!(player.entity.max_health, 60);
        assert_eq!(player.entity.health, 60);
    }

    #[test]
    fn test_level_zero_player_still_levels() {
        assert_eq!(xp_for_next_level(0), xp_for_next_level(1));
        let mut player = Player::new("Hero", "square");
        player.entity.level = 0;
        assert_eq!(player.gain_experience(250), 2);
        assert_eq!(player.level(), 2);
    }

    #[test]
    fn test_gain_experience_multiple_levels() {
        let mut player = Player::new("Hero", "square");
        // 100 (L1) + 282 (L2) = 382
        assert_eq!(player.gain_experience(400), 2);
        assert_eq!(player.level(), 3);
    }

    #[test]
    fn test_equipment_folds_into_power() {
        let catalog = ItemCatalog::builtin();
        let mut player = Player::new("Hero", "square");
        let base_attack = player.attack_power(0.0);
        let base_defense = player.defense_power(0.0);

        player
            .equipment
            .equip(catalog.get("iron_sword").unwrap().clone())
            .unwrap();
        player
            .equipment
            .equip(catalog.get("chain_mail").unwrap().clone())
            .unwrap();

        assert_eq!(player.attack_power(0.0), base_attack + 3);
        assert_eq!(player.defense_power(0.0), base_defense + 4);
    }

    #[test]
    fn test_armor_mitigates_player_damage() {
        let catalog = ItemCatalog::builtin();
        let mut player = Player::new("Hero", "square");
        player
            .equipment
            .equip(catalog.get("chain_mail").unwrap().clone())
            .unwrap();
        // defense 2 + 4 from armor
        assert_eq!(Combatant::take_damage(&mut player, 10, 0.0), 4);
        assert_eq!(player.entity.health, 46);
    }
}
