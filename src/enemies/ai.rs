//! Enemy decision making.
//!
//! [`decide_action`] is called once per decision point, both out of combat
//! (from the roster's update) and on the enemy's turn in a combat session.
//! Priority order:
//!
//! 1. Not in the player's room: maybe move, subject to the archetype's move
//!    interval.
//! 2. Hurt below the flee threshold (berserkers excepted): flee to a
//!    connected, unlocked room. With nowhere to go, fight on.
//! 3. Otherwise attack: a special attack, a tactical maneuver, or a plain hit.

use rand::distributions::WeightedIndex;
use rand::prelude::*;

use super::types::{AiType, Enemy};
use crate::core::config::AiConfig;
use crate::core::constants::{DISARM_ATTACK_PENALTY, FEINT_DEFENSE_PENALTY, FLANK_ATTACK_BONUS};
use crate::entity::{Buff, Entity};
use crate::world::{next_step_toward, open_neighbors, World};

/// Non-damaging tactical move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maneuver {
    /// Gains position: the enemy hits harder for a while.
    Flank,
    /// Draws the player's guard: player defense drops.
    Feint,
    /// Knocks the player's weapon aside: player attack drops.
    Disarm,
}

impl Maneuver {
    pub const ALL: [Maneuver; 3] = [Maneuver::Flank, Maneuver::Feint, Maneuver::Disarm];

    /// Applies the maneuver's buff or debuff and returns the narration.
    pub fn apply(&self, enemy: &mut Entity, player: &mut Entity, now: f64, duration: f64) -> String {
        let until = now + duration;
        match self {
            Maneuver::Flank => {
                enemy.add_buff(Buff::new(FLANK_ATTACK_BONUS, 0, until));
                format!("The {} circles around to flank you!", enemy.name)
            }
            Maneuver::Feint => {
                player.add_buff(Buff::new(0, -FEINT_DEFENSE_PENALTY, until));
                format!("The {} feints and draws your guard wide!", enemy.name)
            }
            Maneuver::Disarm => {
                player.add_buff(Buff::new(-DISARM_ATTACK_PENALTY, 0, until));
                format!("The {} strikes at your weapon arm!", enemy.name)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnemyAction {
    Wait,
    Move { to: String },
    Flee { to: String },
    Attack,
    Special { name: String },
    Maneuver(Maneuver),
}

pub fn decide_action(
    enemy: &Enemy,
    player_room: &str,
    world: &dyn World,
    config: &AiConfig,
    now: f64,
    rng: &mut impl Rng,
) -> EnemyAction {
    if !enemy.is_alive() {
        return EnemyAction::Wait;
    }

    if enemy.current_room != player_room {
        return decide_movement(enemy, player_room, world, config, now, rng);
    }

    if wants_to_flee(enemy) {
        if let Some(to) = flee_destination(enemy, world, rng) {
            return EnemyAction::Flee { to };
        }
    }

    choose_attack(enemy, config, rng)
}

/// Whether an enemy is hurt enough to run.
pub fn wants_to_flee(enemy: &Enemy) -> bool {
    enemy.ai_type != AiType::Berserker && enemy.health_fraction() <= enemy.flee_threshold
}

fn decide_movement(
    enemy: &Enemy,
    player_room: &str,
    world: &dyn World,
    config: &AiConfig,
    now: f64,
    rng: &mut impl Rng,
) -> EnemyAction {
    let Some(interval) = enemy.ai_type.move_interval() else {
        return EnemyAction::Wait;
    };
    if now < enemy.last_move_time + interval {
        return EnemyAction::Wait;
    }

    if enemy.ai_type == AiType::Aggressive && rng.gen_bool(config.aggressive_pursuit_chance) {
        if let Some(step) = next_step_toward(world, &enemy.current_room, player_room) {
            if enemy.can_enter(&step) {
                return EnemyAction::Move { to: step };
            }
        }
    }

    let candidates: Vec<String> = open_neighbors(world, &enemy.current_room)
        .into_iter()
        .filter(|room| enemy.can_enter(room))
        .collect();
    match candidates.choose(rng) {
        Some(to) => EnemyAction::Move { to: to.clone() },
        None => EnemyAction::Wait,
    }
}

/// A random connected, unlocked room the enemy is allowed into.
pub fn flee_destination(enemy: &Enemy, world: &dyn World, rng: &mut impl Rng) -> Option<String> {
    if enemy.ai_type == AiType::Stationary {
        return None;
    }
    let candidates: Vec<String> = open_neighbors(world, &enemy.current_room)
        .into_iter()
        .filter(|room| enemy.can_enter(room))
        .collect();
    candidates.choose(rng).cloned()
}

fn choose_attack(enemy: &Enemy, config: &AiConfig, rng: &mut impl Rng) -> EnemyAction {
    if !enemy.special_attacks.is_empty() && rng.gen_bool(config.special_attack_chance) {
        if let Some(name) = pick_special_attack(enemy, rng) {
            return EnemyAction::Special { name };
        }
    }

    if enemy.ai_type == AiType::Tactical && rng.gen_bool(config.tactical_maneuver_chance) {
        if let Some(maneuver) = Maneuver::ALL.choose(rng) {
            return EnemyAction::Maneuver(*maneuver);
        }
    }

    EnemyAction::Attack
}

/// Rolls every special attack's own trigger chance, then picks one of the
/// ones that fired, weighted by chance.
pub fn pick_special_attack(enemy: &Enemy, rng: &mut impl Rng) -> Option<String> {
    let fired: Vec<(&String, f64)> = enemy
        .special_attacks
        .iter()
        .map(|(name, attack)| (name, attack.chance.clamp(0.0, 1.0)))
        .filter(|(_, chance)| *chance > 0.0)
        .filter(|(_, chance)| rng.gen_bool(*chance))
        .collect();

    match fired.len() {
        0 => None,
        1 => Some(fired[0].0.clone()),
        _ => {
            let weights = fired.iter().map(|(_, chance)| *chance);
            let index = WeightedIndex::new(weights).ok()?;
            Some(fired[index.sample(rng)].0.clone())
        }
    }
}

/// Damage multiplier for berserkers: 1.0 at full health rising to the
/// configured maximum as health approaches zero.
pub fn berserker_multiplier(enemy: &Enemy, config: &AiConfig) -> f64 {
    if enemy.ai_type != AiType::Berserker {
        return 1.0;
    }
    let missing = (1.0 - enemy.health_fraction()).clamp(0.0, 1.0);
    1.0 + (config.berserker_max_multiplier - 1.0) * missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::types::{EnemyId, SpecialAttack};
    use crate::world::RoomGraph;
    use rand::rngs::mock::StepRng;
    use rand_chacha::ChaCha8Rng;

    fn world() -> RoomGraph {
        let mut world = RoomGraph::new();
        world.connect("den", "north", "path", "south");
        world.connect("path", "north", "clearing", "south");
        world
    }

    fn enemy(ai_type: AiType, room: &str) -> Enemy {
        Enemy::new(EnemyId(1), Entity::new("Wolf", 20, 5, 0), ai_type, room)
    }

    #[test]
    fn test_stationary_never_moves() {
        let world = world();
        let enemy = enemy(AiType::Stationary, "den");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for t in 0..10 {
            let action = decide_action(
                &enemy,
                "clearing",
                &world,
                &AiConfig::default(),
                t as f64 * 100.0,
                &mut rng,
            );
            assert_eq!(action, EnemyAction::Wait);
        }
    }

    #[test]
    fn test_move_interval_respected() {
        let world = world();
        let mut enemy = enemy(AiType::Cautious, "den");
        enemy.last_move_time = 100.0;
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let config = AiConfig::default();

        assert_eq!(
            decide_action(&enemy, "clearing", &world, &config, 124.0, &mut rng),
            EnemyAction::Wait
        );
        assert_eq!(
            decide_action(&enemy, "clearing", &world, &config, 125.0, &mut rng),
            EnemyAction::Move {
                to: "path".to_string()
            }
        );
    }

    #[test]
    fn test_aggressive_pursues_player() {
        let world = world();
        let enemy = enemy(AiType::Aggressive, "path");
        let mut config = AiConfig::default();
        config.aggressive_pursuit_chance = 1.0;
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..20 {
            assert_eq!(
                decide_action(&enemy, "clearing", &world, &config, 50.0, &mut rng),
                EnemyAction::Move {
                    to: "clearing".to_string()
                }
            );
        }
    }

    #[test]
    fn test_allowed_rooms_limit_movement() {
        let world = world();
        let mut enemy = enemy(AiType::Basic, "path");
        enemy.allowed_rooms = ["path", "den"].iter().map(|s| s.to_string()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..20 {
            let action =
                decide_action(&enemy, "clearing", &world, &AiConfig::default(), 50.0, &mut rng);
            assert_eq!(action, EnemyAction::Move { to: "den".to_string() });
        }
    }

    #[test]
    fn test_hurt_enemy_flees() {
        let world = world();
        let mut enemy = enemy(AiType::Cautious, "path");
        enemy.entity.lose_health(17);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let action = decide_action(&enemy, "path", &world, &AiConfig::default(), 0.0, &mut rng);
        assert!(matches!(action, EnemyAction::Flee { .. }));
    }

    #[test]
    fn test_berserker_never_flees() {
        let world = world();
        let mut enemy = enemy(AiType::Berserker, "path");
        enemy.entity.lose_health(19);
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        for _ in 0..20 {
            let action = decide_action(&enemy, "path", &world, &AiConfig::default(), 0.0, &mut rng);
            assert_eq!(action, EnemyAction::Attack);
        }
    }

    #[test]
    fn test_cornered_enemy_attacks() {
        let mut world = world();
        world.lock("den", "path");
        let mut enemy = enemy(AiType::Basic, "den");
        enemy.entity.lose_health(18);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let action = decide_action(&enemy, "den", &world, &AiConfig::default(), 0.0, &mut rng);
        assert_eq!(action, EnemyAction::Attack);
    }

    #[test]
    fn test_no_specials_means_regular_attacks() {
        let world = world();
        let enemy = enemy(AiType::Basic, "den");
        let mut config = AiConfig::default();
        config.special_attack_chance = 1.0;
        // StepRng(0, 0) makes every probability roll succeed.
        let mut rng = StepRng::new(0, 0);
        let action = decide_action(&enemy, "den", &world, &config, 0.0, &mut rng);
        assert_eq!(action, EnemyAction::Attack);
    }

    #[test]
    fn test_special_attack_selected_when_it_fires() {
        let world = world();
        let mut enemy = enemy(AiType::Basic, "den");
        enemy
            .special_attacks
            .insert("bite".to_string(), SpecialAttack::new(0.5, 1.5, "Bite!"));
        let mut rng = StepRng::new(0, 0);
        let action = decide_action(&enemy, "den", &world, &AiConfig::default(), 0.0, &mut rng);
        assert_eq!(
            action,
            EnemyAction::Special {
                name: "bite".to_string()
            }
        );
    }

    #[test]
    fn test_special_selection_only_returns_known_names() {
        let mut enemy = enemy(AiType::Basic, "den");
        enemy
            .special_attacks
            .insert("bite".to_string(), SpecialAttack::new(0.6, 1.5, "Bite!"));
        enemy
            .special_attacks
            .insert("howl".to_string(), SpecialAttack::new(0.3, 0.0, "Howl!"));
        enemy
            .special_attacks
            .insert("never".to_string(), SpecialAttack::new(0.0, 9.0, "Never"));
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        for _ in 0..200 {
            if let Some(name) = pick_special_attack(&enemy, &mut rng) {
                assert!(name == "bite" || name == "howl");
            }
        }
    }

    #[test]
    fn test_tactical_can_maneuver() {
        let world = world();
        let enemy = enemy(AiType::Tactical, "den");
        let mut rng = StepRng::new(0, 0);
        let action = decide_action(&enemy, "den", &world, &AiConfig::default(), 0.0, &mut rng);
        assert_eq!(action, EnemyAction::Maneuver(Maneuver::Flank));
    }

    #[test]
    fn test_berserker_multiplier_scales_with_missing_health() {
        let config = AiConfig::default();
        let mut enemy = enemy(AiType::Berserker, "den");
        assert!((berserker_multiplier(&enemy, &config) - 1.0).abs() < 1e-9);
        enemy.entity.lose_health(10);
        assert!((berserker_multiplier(&enemy, &config) - 1.5).abs() < 1e-9);
        enemy.entity.lose_health(10);
        assert!((berserker_multiplier(&enemy, &config) - 2.0).abs() < 1e-9);

        let basic = self::enemy(AiType::Basic, "den");
        assert_eq!(berserker_multiplier(&basic, &config), 1.0);
    }

    #[test]
    fn test_maneuvers_apply_debuffs() {
        let mut wolf = Entity::new("Wolf", 20, 5, 0);
        let mut hero = Entity::new("Hero", 50, 8, 4);
        Maneuver::Feint.apply(&mut wolf, &mut hero, 0.0, 10.0);
        Maneuver::Disarm.apply(&mut wolf, &mut hero, 0.0, 10.0);
        Maneuver::Flank.apply(&mut wolf, &mut hero, 0.0, 10.0);
        assert_eq!(hero.defense_power(5.0), 2);
        assert_eq!(hero.attack_power(5.0), 5);
        assert_eq!(wolf.attack_power(5.0), 8);
        assert_eq!(hero.attack_power(11.0), 8);
    }
}
