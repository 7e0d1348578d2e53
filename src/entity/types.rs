use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Capability tags carried by every entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    Player,
    Enemy,
}

/// Temporary stat modifier. Negative values are debuffs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub attack: i32,
    pub defense: i32,
    /// Active while `now <= expires_at`.
    pub expires_at: f64,
}

impl Buff {
    pub fn new(attack: i32, defense: i32, expires_at: f64) -> Self {
        Self {
            attack,
            defense,
            expires_at,
        }
    }

    pub fn is_active(&self, now: f64) -> bool {
        now <= self.expires_at
    }
}

/// Stats shared by the player and enemies.
///
/// `0 <= health <= max_health` holds after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub health: i32,
    pub max_health: i32,
    pub attack: i32,
    pub defense: i32,
    pub level: u32,
    pub tags: BTreeSet<EntityTag>,
    #[serde(default)]
    pub buffs: Vec<Buff>,
}

impl Entity {
    pub fn new(name: impl Into<String>, max_health: i32, attack: i32, defense: i32) -> Self {
        let max_health = max_health.max(1);
        Self {
            name: name.into(),
            health: max_health,
            max_health,
            attack: attack.max(0),
            defense: defense.max(0),
            level: 1,
            tags: BTreeSet::new(),
            buffs: Vec::new(),
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }

    pub fn with_tag(mut self, tag: EntityTag) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn has_tag(&self, tag: EntityTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn health_fraction(&self) -> f64 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health as f64 / self.max_health as f64
    }

    /// Base attack plus active buffs, never negative.
    pub fn attack_power(&self, now: f64) -> i32 {
        let buffs: i32 = self.active_buffs(now).map(|b| b.attack).sum();
        (self.attack + buffs).max(0)
    }

    /// Base defense plus active buffs, never negative.
    pub fn defense_power(&self, now: f64) -> i32 {
        let buffs: i32 = self.active_buffs(now).map(|b| b.defense).sum();
        (self.defense + buffs).max(0)
    }

    fn active_buffs(&self, now: f64) -> impl Iterator<Item = &Buff> {
        self.buffs.iter().filter(move |b| b.is_active(now))
    }

    pub fn add_buff(&mut self, buff: Buff) {
        self.buffs.push(buff);
    }

    /// Drops expired buffs. Expired buffs are already ignored by the power
    /// accessors, this only keeps the list short.
    pub fn prune_buffs(&mut self, now: f64) {
        self.buffs.retain(|b| b.is_active(now));
    }

    /// Defense-mitigated hit. Returns `max(1, amount - defense)`.
    pub fn take_damage(&mut self, amount: i32, now: f64) -> i32 {
        let actual = mitigated_damage(amount, self.defense_power(now));
        self.lose_health(actual);
        actual
    }

    /// Unmitigated health loss. Returns how much health was actually lost.
    pub fn lose_health(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health - amount.max(0)).max(0);
        before - self.health
    }

    /// Returns how much health was actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = self.health.saturating_add(amount.max(0)).min(self.max_health);
        self.health - before
    }

    pub fn restore_full(&mut self) {
        self.health = self.max_health;
        self.buffs.clear();
    }
}

/// Damage after defense, floored at 1. Negative inputs count as 0.
pub fn mitigated_damage(amount: i32, defense: i32) -> i32 {
    (amount.max(0) - defense.max(0)).max(1)
}

/// Anything that can be hit in combat.
pub trait Combatant {
    fn entity(&self) -> &Entity;

    fn entity_mut(&mut self) -> &mut Entity;

    fn attack_power(&self, now: f64) -> i32 {
        self.entity().attack_power(now)
    }

    fn defense_power(&self, now: f64) -> i32 {
        self.entity().defense_power(now)
    }

    fn take_damage(&mut self, amount: i32, now: f64) -> i32 {
        let actual = mitigated_damage(amount, self.defense_power(now));
        self.entity_mut().lose_health(actual);
        actual
    }

    fn heal(&mut self, amount: i32) -> i32 {
        self.entity_mut().heal(amount)
    }

    fn name(&self) -> &str {
        &self.entity().name
    }

    fn is_alive(&self) -> bool {
        self.entity().is_alive()
    }
}

impl Combatant for Entity {
    fn entity(&self) -> &Entity {
        self
    }

    fn entity_mut(&mut self) -> &mut Entity {
        self
    }
}
