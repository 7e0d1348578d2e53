use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;

use super::ai::{decide_action, EnemyAction};
use super::types::{Enemy, EnemyId, EnemyRecord};
use crate::core::config::AiConfig;
use crate::core::events::{EventSink, Tone};
use crate::world::World;

/// What a roster update did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterUpdate {
    pub respawned: Vec<EnemyId>,
    pub moved: Vec<(EnemyId, String)>,
}

/// Owns every enemy in the game.
///
/// Passed explicitly to the spawner and to combat sessions; there is no
/// global instance.
#[derive(Debug, Clone, Default)]
pub struct EnemyRoster {
    enemies: BTreeMap<EnemyId, Enemy>,
    next_id: u32,
}

impl EnemyRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an enemy under a fresh id and returns the id.
    pub fn add(&mut self, mut enemy: Enemy) -> EnemyId {
        self.next_id += 1;
        let id = EnemyId(self.next_id);
        enemy.id = id;
        self.enemies.insert(id, enemy);
        id
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(&id)
    }

    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.get_mut(&id)
    }

    pub fn remove(&mut self, id: EnemyId) -> Option<Enemy> {
        self.enemies.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.values()
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Number of living enemies.
    pub fn active_count(&self) -> usize {
        self.enemies.values().filter(|e| e.is_alive()).count()
    }

    /// Enemies holding a slot: the living plus the dead that will respawn.
    pub fn occupied_count(&self) -> usize {
        self.enemies
            .values()
            .filter(|e| e.is_alive() || e.respawn_delay.is_some())
            .count()
    }

    /// Living enemies currently in `room`.
    pub fn alive_in_room(&self, room: &str) -> Vec<EnemyId> {
        self.enemies
            .values()
            .filter(|e| e.is_alive() && e.current_room == room)
            .map(|e| e.id)
            .collect()
    }

    /// Polled every external tick: respawns enemies whose delay has passed
    /// and lets idle enemies wander. Enemies listed in `engaged` are in a
    /// combat session and are left alone.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        now: f64,
        player_room: &str,
        engaged: &BTreeSet<EnemyId>,
        world: &dyn World,
        config: &AiConfig,
        rng: &mut impl Rng,
        events: &mut dyn EventSink,
    ) -> RosterUpdate {
        let mut result = RosterUpdate::default();

        for enemy in self.enemies.values_mut() {
            if engaged.contains(&enemy.id) {
                continue;
            }

            if !enemy.is_alive() {
                if enemy.is_respawn_due(now) {
                    enemy.respawn(now);
                    log::debug!("{} {} respawned in {}", enemy.name(), enemy.id, enemy.current_room);
                    if enemy.current_room == player_room {
                        events.say(format!("A {} appears!", enemy.name()), Tone::Warning);
                    }
                    result.respawned.push(enemy.id);
                }
                continue;
            }

            let action = decide_action(enemy, player_room, world, config, now, rng);
            let to = match action {
                EnemyAction::Move { to } => to,
                // Out of combat a hurt enemy just slinks away.
                EnemyAction::Flee { to } => {
                    enemy.is_fleeing = true;
                    to
                }
                _ => continue,
            };

            let from = std::mem::replace(&mut enemy.current_room, to.clone());
            enemy.last_move_time = now;
            if from == player_room {
                events.say(format!("The {} leaves.", enemy.name()), Tone::Info);
            } else if to == player_room {
                enemy.is_fleeing = false;
                events.say(format!("A {} enters the area!", enemy.name()), Tone::Warning);
            }
            result.moved.push((enemy.id, to));
        }

        result
    }

    /// Drops dead enemies that will never respawn. Returns their ids.
    pub fn cleanup(&mut self) -> Vec<EnemyId> {
        let gone: Vec<EnemyId> = self
            .enemies
            .values()
            .filter(|e| !e.is_alive() && e.respawn_delay.is_none())
            .map(|e| e.id)
            .collect();
        for id in &gone {
            self.enemies.remove(id);
        }
        gone
    }

    pub fn to_records(&self) -> Vec<EnemyRecord> {
        self.enemies.values().map(Enemy::to_record).collect()
    }

    /// Rebuilds a roster from saved records. Ids are reassigned.
    pub fn from_records(records: Vec<EnemyRecord>) -> Self {
        let mut roster = Self::new();
        for record in records {
            roster.add(Enemy::from_record(EnemyId(0), record));
        }
        roster
    }
}
