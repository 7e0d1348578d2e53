use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::constants::*;
use crate::entity::{Combatant, Entity, EntityTag};

/// Roster handle for one enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Behaviour policy governing how an enemy moves, fights and flees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiType {
    #[default]
    Basic,
    Aggressive,
    Cautious,
    Berserker,
    Tactical,
    Stationary,
}

impl AiType {
    /// Seconds between wandering moves. Stationary enemies never move.
    pub fn move_interval(&self) -> Option<f64> {
        match self {
            AiType::Basic => Some(BASIC_MOVE_INTERVAL_SECONDS),
            AiType::Aggressive => Some(AGGRESSIVE_MOVE_INTERVAL_SECONDS),
            AiType::Cautious => Some(CAUTIOUS_MOVE_INTERVAL_SECONDS),
            AiType::Berserker => Some(BERSERKER_MOVE_INTERVAL_SECONDS),
            AiType::Tactical => Some(TACTICAL_MOVE_INTERVAL_SECONDS),
            AiType::Stationary => None,
        }
    }

    pub fn initiative_bonus(&self) -> i32 {
        match self {
            AiType::Aggressive | AiType::Berserker => 1,
            AiType::Tactical => 2,
            AiType::Stationary => -2,
            AiType::Basic | AiType::Cautious => 0,
        }
    }

    /// Shift applied to the player's flee chance against this archetype.
    pub fn flee_modifier(&self) -> f64 {
        match self {
            AiType::Aggressive | AiType::Berserker => -0.1,
            AiType::Cautious => 0.1,
            AiType::Stationary => 0.2,
            AiType::Basic | AiType::Tactical => 0.0,
        }
    }
}

/// Secondary effect of a special attack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpecialEffect {
    Poison { strength: f64, duration: f64 },
    Bleed { strength: f64, duration: f64 },
    /// Heals the attacker by a fraction of the damage dealt.
    Drain { fraction: f64 },
    /// Temporary attack penalty on the target.
    Weaken { amount: i32, duration: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialAttack {
    /// Independent trigger chance in `[0, 1]`.
    pub chance: f64,
    #[serde(default = "default_multiplier")]
    pub damage_multiplier: f64,
    #[serde(default)]
    pub bonus_damage: i32,
    #[serde(default)]
    pub effect: Option<SpecialEffect>,
    pub message: String,
}

fn default_multiplier() -> f64 {
    1.0
}

impl SpecialAttack {
    pub fn new(chance: f64, damage_multiplier: f64, message: impl Into<String>) -> Self {
        Self {
            chance,
            damage_multiplier,
            bonus_damage: 0,
            effect: None,
            message: message.into(),
        }
    }

    pub fn with_effect(mut self, effect: SpecialEffect) -> Self {
        self.effect = Some(effect);
        self
    }
}

/// A hostile entity in the roster.
///
/// `health > 0` exactly when alive. `death_time` is set once per death and
/// cleared on respawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: EnemyId,
    pub entity: Entity,
    pub ai_type: AiType,
    pub special_attacks: BTreeMap<String, SpecialAttack>,
    pub drop_table: Option<String>,
    pub experience: u32,
    /// Rooms the enemy may wander into. Empty means anywhere.
    pub allowed_rooms: BTreeSet<String>,
    pub current_room: String,
    pub home_room: String,
    /// `None` means the enemy is removed after death instead of respawning.
    pub respawn_delay: Option<f64>,
    pub death_time: Option<f64>,
    pub last_move_time: f64,
    pub flee_threshold: f64,
    pub is_fleeing: bool,
    pub initiative_bonus: i32,
}

impl Enemy {
    pub fn new(id: EnemyId, entity: Entity, ai_type: AiType, room: impl Into<String>) -> Self {
        let room = room.into();
        Self {
            id,
            entity: entity.with_tag(EntityTag::Enemy),
            ai_type,
            special_attacks: BTreeMap::new(),
            drop_table: None,
            experience: 0,
            allowed_rooms: BTreeSet::new(),
            current_room: room.clone(),
            home_room: room,
            respawn_delay: None,
            death_time: None,
            last_move_time: 0.0,
            flee_threshold: DEFAULT_FLEE_THRESHOLD,
            is_fleeing: false,
            initiative_bonus: ai_type.initiative_bonus(),
        }
    }

    pub fn name(&self) -> &str {
        &self.entity.name
    }

    pub fn is_alive(&self) -> bool {
        self.entity.is_alive()
    }

    pub fn health_fraction(&self) -> f64 {
        self.entity.health_fraction()
    }

    pub fn can_enter(&self, room: &str) -> bool {
        self.allowed_rooms.is_empty() || self.allowed_rooms.contains(room)
    }

    /// Records the moment of death. Later calls keep the first timestamp.
    pub fn mark_dead(&mut self, now: f64) {
        self.entity.health = 0;
        if self.death_time.is_none() {
            self.death_time = Some(now);
        }
        self.is_fleeing = false;
    }

    pub fn is_respawn_due(&self, now: f64) -> bool {
        match (self.death_time, self.respawn_delay) {
            (Some(died), Some(delay)) => now >= died + delay,
            _ => false,
        }
    }

    /// Brings a dead enemy back at full health in its home room.
    pub fn respawn(&mut self, now: f64) {
        self.entity.restore_full();
        self.death_time = None;
        self.is_fleeing = false;
        self.current_room = self.home_room.clone();
        self.last_move_time = now;
    }

    pub fn to_record(&self) -> EnemyRecord {
        EnemyRecord {
            name: self.entity.name.clone(),
            health: self.entity.health,
            max_health: self.entity.max_health,
            attack: self.entity.attack,
            experience: self.experience,
            current_room: self.current_room.clone(),
            last_move_time: self.last_move_time,
            death_time: self.death_time,
            respawn_delay: self.respawn_delay,
            special_attacks: if self.special_attacks.is_empty() {
                None
            } else {
                Some(self.special_attacks.clone())
            },
            defense: self.entity.defense,
            level: self.entity.level,
            ai_type: self.ai_type,
            home_room: Some(self.home_room.clone()),
            allowed_rooms: self.allowed_rooms.clone(),
            drop_table: self.drop_table.clone(),
            flee_threshold: self.flee_threshold,
        }
    }

    pub fn from_record(id: EnemyId, record: EnemyRecord) -> Self {
        let mut entity = Entity::new(
            record.name,
            record.max_health,
            record.attack,
            record.defense,
        )
        .with_level(record.level);
        entity.health = record.health.clamp(0, entity.max_health);

        let home_room = record
            .home_room
            .unwrap_or_else(|| record.current_room.clone());
        let mut enemy = Enemy::new(id, entity, record.ai_type, home_room);
        enemy.current_room = record.current_room;
        enemy.experience = record.experience;
        enemy.last_move_time = record.last_move_time;
        enemy.respawn_delay = record.respawn_delay;
        enemy.special_attacks = record.special_attacks.unwrap_or_default();
        enemy.allowed_rooms = record.allowed_rooms;
        enemy.drop_table = record.drop_table;
        enemy.flee_threshold = record.flee_threshold;
        // Keep the alive/dead invariant even for hand-edited records.
        enemy.death_time = if enemy.is_alive() {
            None
        } else {
            Some(record.death_time.unwrap_or(record.last_move_time))
        };
        enemy
    }
}

impl Combatant for Enemy {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}

fn default_level() -> u32 {
    1
}

fn default_flee_threshold() -> f64 {
    DEFAULT_FLEE_THRESHOLD
}

/// Persisted shape of an enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyRecord {
    pub name: String,
    pub health: i32,
    pub max_health: i32,
    pub attack: i32,
    pub experience: u32,
    pub current_room: String,
    pub last_move_time: f64,
    pub death_time: Option<f64>,
    pub respawn_delay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_attacks: Option<BTreeMap<String, SpecialAttack>>,
    #[serde(default)]
    pub defense: i32,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub ai_type: AiType,
    #[serde(default)]
    pub home_room: Option<String>,
    #[serde(default)]
    pub allowed_rooms: BTreeSet<String>,
    #[serde(default)]
    pub drop_table: Option<String>,
    #[serde(default = "default_flee_threshold")]
    pub flee_threshold: f64,
}
