//! Level-scaled regional spawning.
//!
//! The external loop calls [`RegionalSpawner::update`] every tick. At most
//! once per check interval it rolls whether the region around the player
//! produces a new enemy, and occasionally a second one when conditions are
//! favourable.

use rand::distributions::WeightedIndex;
use rand::prelude::*;

use super::regions::builtin_regions;
use super::types::{Region, RegionKind, SpawnTemplate};
use crate::core::config::SpawnConfig;
use crate::core::events::{EventSink, Tone};
use crate::core::time::interval_elapsed;
use crate::enemies::{Enemy, EnemyId, EnemyRoster};
use crate::entity::Player;
use crate::world::Environment;

/// Picks a level-appropriate template, weighted toward the player's level.
///
/// Only templates whose band overlaps `[player_level, player_level + window]`
/// are considered. Returns `None` when nothing qualifies.
pub fn select_template<'a>(
    region: &'a Region,
    player_level: u32,
    window: u32,
    rng: &mut impl Rng,
) -> Option<&'a SpawnTemplate> {
    let high = player_level.saturating_add(window);
    let candidates: Vec<&SpawnTemplate> = region
        .templates
        .iter()
        .filter(|t| t.overlaps(player_level, high))
        .collect();
    let weights: Vec<f64> = candidates
        .iter()
        .map(|t| t.selection_weight(player_level))
        .collect();
    let index = WeightedIndex::new(&weights).ok()?;
    Some(candidates[index.sample(rng)])
}

/// Builds a new enemy for `room`, or `None` when the roster is at capacity
/// or the region has nothing suitable. The enemy is not added to the roster.
///
/// Dead enemies waiting to respawn still hold their slot.
pub fn spawn_enemy_for_region(
    region: &Region,
    room: &str,
    player_level: u32,
    roster: &EnemyRoster,
    config: &SpawnConfig,
    rng: &mut impl Rng,
) -> Option<Enemy> {
    let occupied = roster.occupied_count();
    if occupied >= config.active_enemy_cap {
        log::trace!("spawn skipped: {occupied} enemies alive or awaiting respawn");
        return None;
    }
    let template = select_template(region, player_level, config.level_window, rng)?;
    Some(template.instantiate(room, player_level, &region.rooms))
}

/// Probability that one spawn check succeeds, capped at `max_chance`.
pub fn spawn_chance(region: &Region, env: &Environment, config: &SpawnConfig) -> f64 {
    let chance = (config.base_chance * env.spawn_modifier * region.density)
        .min(config.max_chance)
        .clamp(0.0, 1.0);
    match region.kind {
        RegionKind::Settlement => (chance * config.settlement_factor).clamp(0.0, 1.0),
        RegionKind::Wilderness | RegionKind::Dungeon => chance,
    }
}

pub struct RegionalSpawner {
    regions: Vec<Region>,
    config: SpawnConfig,
    last_check: Option<f64>,
}

impl RegionalSpawner {
    pub fn new(regions: Vec<Region>, config: SpawnConfig) -> Self {
        Self {
            regions,
            config,
            last_check: None,
        }
    }

    pub fn builtin(config: SpawnConfig) -> Self {
        Self::new(builtin_regions(), config)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn add_region(&mut self, region: Region) {
        self.regions.push(region);
    }

    pub fn region_for_room(&self, room: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.contains_room(room))
    }

    /// Polled every tick. Returns the ids of any enemies spawned into the
    /// player's room.
    pub fn update(
        &mut self,
        now: f64,
        player: &Player,
        env: &Environment,
        roster: &mut EnemyRoster,
        rng: &mut impl Rng,
        events: &mut dyn EventSink,
    ) -> Vec<EnemyId> {
        if let Some(last) = self.last_check {
            if !interval_elapsed(last, self.config.check_interval, now) {
                return Vec::new();
            }
        }
        self.last_check = Some(now);

        let mut spawned = Vec::new();
        let Some(region) = self.region_for_room(&player.current_room) else {
            return spawned;
        };

        let chance = spawn_chance(region, env, &self.config);
        if !rng.gen_bool(chance) {
            return spawned;
        }

        let mut attempts = 1;
        let combined = env.spawn_modifier * region.density;
        if combined > self.config.bonus_modifier_threshold && rng.gen_bool(self.config.bonus_chance) {
            attempts += 1;
        }

        for _ in 0..attempts {
            let Some(mut enemy) = spawn_enemy_for_region(
                region,
                &player.current_room,
                player.level(),
                roster,
                &self.config,
                rng,
            ) else {
                break;
            };
            enemy.last_move_time = now;
            let name = enemy.name().to_string();
            let id = roster.add(enemy);
            log::debug!("spawned {name} {id} in {} ({})", player.current_room, region.id);
            events.say(format!("A {name} appears!"), Tone::Warning);
            spawned.push(id);
        }

        spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::GameEvent;
    use crate::entity::Entity;
    use crate::enemies::AiType;
    use crate::spawn::StatRange;
    use rand::rngs::mock::StepRng;
    use rand_chacha::ChaCha8Rng;

    fn region() -> Region {
        Region::new("vale", "Vale", RegionKind::Wilderness, 1.0)
            .with_rooms(&["glade", "ford"])
            .with_template(
                SpawnTemplate::new("Boar", (3, 5), 1.0)
                    .with_stats(StatRange::new(10, 20), StatRange::new(2, 6), StatRange::fixed(0)),
            )
            .with_template(SpawnTemplate::new("Ogre", (8, 10), 5.0))
    }

    fn player_at(room: &str, level: u32) -> Player {
        let mut player = Player::new("Hero", room);
        player.entity.level = level;
        player
    }

    #[test]
    fn test_never_selects_out_of_window() {
        let region = region();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let t = select_template(&region, 5, 2, &mut rng).unwrap();
            assert_eq!(t.name, "Boar");
        }
    }

    #[test]
    fn test_no_candidates_means_no_spawn() {
        let region = region();
        let roster = EnemyRoster::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let config = SpawnConfig::default();
        assert!(spawn_enemy_for_region(&region, "glade", 20, &roster, &config, &mut rng).is_none());
    }

    #[test]
    fn test_cap_blocks_spawn() {
        let region = region();
        let mut roster = EnemyRoster::new();
        let config = SpawnConfig {
            active_enemy_cap: 2,
            ..SpawnConfig::default()
        };
        for _ in 0..2 {
            roster.add(Enemy::new(EnemyId(0), Entity::new("Rat", 5, 1, 0), AiType::Basic, "glade"));
        }
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(spawn_enemy_for_region(&region, "glade", 4, &roster, &config, &mut rng).is_none());

        // A respawning corpse keeps its slot.
        let first = roster.get_mut(EnemyId(1)).unwrap();
        first.respawn_delay = Some(60.0);
        first.mark_dead(0.0);
        assert!(spawn_enemy_for_region(&region, "glade", 4, &roster, &config, &mut rng).is_none());

        // A permanent corpse does not.
        let first = roster.get_mut(EnemyId(1)).unwrap();
        first.respawn_delay = None;
        assert!(spawn_enemy_for_region(&region, "glade", 4, &roster, &config, &mut rng).is_some());
    }

    #[test]
    fn test_spawned_stats_scale_with_level() {
        let region = region();
        let roster = EnemyRoster::new();
        let config = SpawnConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let boar = spawn_enemy_for_region(&region, "glade", 5, &roster, &config, &mut rng).unwrap();
        assert_eq!(boar.entity.max_health, 20);
        assert_eq!(boar.entity.attack, 6);
        assert_eq!(boar.home_room, "glade");
    }

    #[test]
    fn test_spawn_chance_is_capped_and_settlements_reduced() {
        let config = SpawnConfig::default();
        let mut wild = region();
        wild.density = 10.0;
        let env = Environment::default();
        assert_eq!(spawn_chance(&wild, &env, &config), config.max_chance);

        wild.kind = RegionKind::Settlement;
        assert!((spawn_chance(&wild, &env, &config) - config.max_chance * config.settlement_factor).abs() < 1e-9);

        let negative = Environment {
            spawn_modifier: -3.0,
            ..Environment::default()
        };
        assert_eq!(spawn_chance(&region(), &negative, &config), 0.0);
    }

    #[test]
    fn test_update_respects_check_interval() {
        let mut spawner = RegionalSpawner::new(vec![region()], SpawnConfig::default());
        let player = player_at("glade", 4);
        let mut roster = EnemyRoster::new();
        let mut events: Vec<GameEvent> = Vec::new();
        // Every roll succeeds.
        let mut rng = StepRng::new(0, 0);
        let env = Environment::default();

        let first = spawner.update(0.0, &player, &env, &mut roster, &mut rng, &mut events);
        assert_eq!(first.len(), 1);
        let too_soon = spawner.update(29.0, &player, &env, &mut roster, &mut rng, &mut events);
        assert!(too_soon.is_empty());
        let again = spawner.update(30.0, &player, &env, &mut roster, &mut rng, &mut events);
        assert_eq!(again.len(), 1);
        assert_eq!(roster.active_count(), 2);
        assert_eq!(events.len(), 2);
        assert_eq!(roster.get(first[0]).unwrap().last_move_time, 0.0);
    }

    #[test]
    fn test_bonus_spawn_when_modifier_high() {
        let mut dense = region();
        dense.density = 2.0;
        let mut spawner = RegionalSpawner::new(vec![dense], SpawnConfig::default());
        let player = player_at("ford", 4);
        let mut roster = EnemyRoster::new();
        let mut events: Vec<GameEvent> = Vec::new();
        let mut rng = StepRng::new(0, 0);

        let spawned = spawner.update(0.0, &player, &Environment::default(), &mut roster, &mut rng, &mut events);
        assert_eq!(spawned.len(), 2);
    }

    #[test]
    fn test_update_outside_any_region_does_nothing() {
        let mut spawner = RegionalSpawner::builtin(SpawnConfig::default());
        let player = player_at("nowhere", 1);
        let mut roster = EnemyRoster::new();
        let mut events: Vec<GameEvent> = Vec::new();
        let mut rng = StepRng::new(0, 0);
        let spawned = spawner.update(0.0, &player, &Environment::default(), &mut roster, &mut rng, &mut events);
        assert!(spawned.is_empty());
        assert!(roster.is_empty());
    }
}
