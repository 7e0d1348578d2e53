use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::constants::DEFAULT_FLEE_THRESHOLD;
use crate::enemies::{AiType, Enemy, EnemyId, SpecialAttack};
use crate::entity::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    #[default]
    Wilderness,
    Dungeon,
    /// Towns and villages. Spawns are rare here.
    Settlement,
}

/// Inclusive stat bounds interpolated by level factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRange {
    pub min: i32,
    pub max: i32,
}

impl StatRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub const fn fixed(value: i32) -> Self {
        Self::new(value, value)
    }

    /// `min` at factor 0, `max` at factor 1.
    pub fn lerp(&self, factor: f64) -> i32 {
        let factor = factor.clamp(0.0, 1.0);
        self.min + ((self.max - self.min) as f64 * factor).round() as i32
    }
}

/// Blueprint an enemy is stamped from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnTemplate {
    pub name: String,
    /// Inclusive `(min, max)` level band.
    pub level_range: (u32, u32),
    pub weight: f64,
    pub health: StatRange,
    pub attack: StatRange,
    pub defense: StatRange,
    pub experience: StatRange,
    #[serde(default)]
    pub ai_type: AiType,
    #[serde(default)]
    pub special_attacks: BTreeMap<String, SpecialAttack>,
    #[serde(default)]
    pub drop_table: Option<String>,
    #[serde(default)]
    pub respawn_delay: Option<f64>,
    #[serde(default = "default_flee_threshold")]
    pub flee_threshold: f64,
}

fn default_flee_threshold() -> f64 {
    DEFAULT_FLEE_THRESHOLD
}

impl SpawnTemplate {
    pub fn new(name: impl Into<String>, level_range: (u32, u32), weight: f64) -> Self {
        Self {
            name: name.into(),
            level_range,
            weight,
            health: StatRange::fixed(10),
            attack: StatRange::fixed(3),
            defense: StatRange::fixed(0),
            experience: StatRange::fixed(10),
            ai_type: AiType::Basic,
            special_attacks: BTreeMap::new(),
            drop_table: None,
            respawn_delay: None,
            flee_threshold: DEFAULT_FLEE_THRESHOLD,
        }
    }

    pub fn with_stats(mut self, health: StatRange, attack: StatRange, defense: StatRange) -> Self {
        self.health = health;
        self.attack = attack;
        self.defense = defense;
        self
    }

    pub fn with_experience(mut self, experience: StatRange) -> Self {
        self.experience = experience;
        self
    }

    pub fn with_ai(mut self, ai_type: AiType) -> Self {
        self.ai_type = ai_type;
        self
    }

    pub fn with_special(mut self, name: &str, attack: SpecialAttack) -> Self {
        self.special_attacks.insert(name.to_string(), attack);
        self
    }

    pub fn with_drop_table(mut self, table: &str) -> Self {
        self.drop_table = Some(table.to_string());
        self
    }

    pub fn with_respawn_delay(mut self, delay: f64) -> Self {
        self.respawn_delay = Some(delay);
        self
    }

    /// Whether the level band intersects `[low, high]`.
    pub fn overlaps(&self, low: u32, high: u32) -> bool {
        let (min, max) = self.level_range;
        min <= high && max >= low
    }

    pub fn mean_level(&self) -> f64 {
        (self.level_range.0 as f64 + self.level_range.1 as f64) / 2.0
    }

    /// Base weight damped by distance from the player's level.
    pub fn selection_weight(&self, player_level: u32) -> f64 {
        let distance = (player_level as f64 - self.mean_level()).abs();
        self.weight.max(0.0) / (1.0 + distance)
    }

    /// `min(1, player_level / level_range.max)`.
    pub fn level_factor(&self, player_level: u32) -> f64 {
        let max = self.level_range.1;
        if max == 0 {
            return 1.0;
        }
        (player_level as f64 / max as f64).min(1.0)
    }

    /// Builds a live enemy scaled to `player_level`, homed in `room`.
    pub fn instantiate(&self, room: &str, player_level: u32, allowed_rooms: &BTreeSet<String>) -> Enemy {
        let factor = self.level_factor(player_level);
        let (low, high) = self.level_range;
        let level = StatRange::new(low as i32, high as i32).lerp(factor).max(1) as u32;

        let entity = Entity::new(
            self.name.clone(),
            self.health.lerp(factor).max(1),
            self.attack.lerp(factor).max(0),
            self.defense.lerp(factor).max(0),
        )
        .with_level(level);

        let mut enemy = Enemy::new(EnemyId(0), entity, self.ai_type, room);
        enemy.experience = self.experience.lerp(factor).max(0) as u32;
        enemy.special_attacks = self.special_attacks.clone();
        enemy.drop_table = self.drop_table.clone();
        enemy.respawn_delay = self.respawn_delay;
        enemy.flee_threshold = self.flee_threshold;
        enemy.allowed_rooms = allowed_rooms.clone();
        enemy
    }
}

/// A named area of the world with its own spawn pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
    pub kind: RegionKind,
    /// Multiplier on spawn probability; 1.0 is average.
    pub density: f64,
    pub rooms: BTreeSet<String>,
    pub templates: Vec<SpawnTemplate>,
}

impl Region {
    pub fn new(id: &str, name: &str, kind: RegionKind, density: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            density,
            rooms: BTreeSet::new(),
            templates: Vec::new(),
        }
    }

    pub fn with_rooms(mut self, rooms: &[&str]) -> Self {
        self.rooms.extend(rooms.iter().map(|r| r.to_string()));
        self
    }

    pub fn with_template(mut self, template: SpawnTemplate) -> Self {
        self.templates.push(template);
        self
    }

    pub fn contains_room(&self, room: &str) -> bool {
        self.rooms.contains(room)
    }
}
