// Combat resolution
pub const PLAYER_BASE_HIT_CHANCE: f64 = 0.9;
pub const PLAYER_HIT_CHANCE_MIN: f64 = 0.5;
pub const PLAYER_HIT_CHANCE_MAX: f64 = 0.99;
pub const ENEMY_BASE_HIT_CHANCE: f64 = 0.8;
pub const ENEMY_HIT_CHANCE_MIN: f64 = 0.5;
pub const ENEMY_HIT_CHANCE_MAX: f64 = 0.95;
pub const PLAYER_DODGE_CHANCE: f64 = 0.12;
pub const CRIT_CHANCE: f64 = 0.05;
pub const CRIT_MULTIPLIER: f64 = 1.5;
pub const DAMAGE_VARIANCE_LOW: i32 = -2;
pub const DAMAGE_VARIANCE_HIGH: i32 = 3;
pub const BASE_FLEE_CHANCE: f64 = 0.5;
pub const FLEE_CHANCE_MIN: f64 = 0.1;
pub const FLEE_CHANCE_MAX: f64 = 0.9;
pub const INITIATIVE_DIE: i32 = 20;

// Skills (cooldowns measured in completed laps of the initiative order)
pub const POWER_STRIKE_MULTIPLIER: f64 = 1.5;
pub const POWER_STRIKE_ACCURACY_PENALTY: f64 = 0.15;
pub const POWER_STRIKE_COOLDOWN: u32 = 2;
pub const SECOND_WIND_HEAL_FRACTION: f64 = 0.25;
pub const SECOND_WIND_COOLDOWN: u32 = 5;
pub const FOCUS_ATTACK_BONUS: i32 = 3;
pub const FOCUS_DURATION_SECONDS: f64 = 15.0;
pub const FOCUS_COOLDOWN: u32 = 4;

// XP and leveling
pub const XP_CURVE_BASE: f64 = 100.0;
pub const XP_CURVE_EXPONENT: f64 = 1.5;
pub const LEVEL_UP_HEALTH: i32 = 10;
pub const LEVEL_UP_ATTACK: i32 = 2;
pub const LEVEL_UP_DEFENSE: i32 = 1;

// Status effects
pub const POISON_TICK_INTERVAL_SECONDS: f64 = 5.0;
pub const BLEEDING_TICK_INTERVAL_SECONDS: f64 = 1.0;
pub const BLEEDING_HEALTH_MESSAGE_INTERVAL_SECONDS: f64 = 3.0;

// Enemy AI
pub const DEFAULT_FLEE_THRESHOLD: f64 = 0.2;
pub const SPECIAL_ATTACK_CHANCE: f64 = 0.3;
pub const AGGRESSIVE_PURSUIT_CHANCE: f64 = 0.7;
pub const TACTICAL_MANEUVER_CHANCE: f64 = 0.25;
pub const BERSERKER_MAX_MULTIPLIER: f64 = 2.0;
pub const MANEUVER_DURATION_SECONDS: f64 = 10.0;
pub const FLANK_ATTACK_BONUS: i32 = 3;
pub const FEINT_DEFENSE_PENALTY: i32 = 2;
pub const DISARM_ATTACK_PENALTY: i32 = 3;

// Move intervals by archetype
pub const BASIC_MOVE_INTERVAL_SECONDS: f64 = 15.0;
pub const AGGRESSIVE_MOVE_INTERVAL_SECONDS: f64 = 10.0;
pub const CAUTIOUS_MOVE_INTERVAL_SECONDS: f64 = 25.0;
pub const BERSERKER_MOVE_INTERVAL_SECONDS: f64 = 12.0;
pub const TACTICAL_MOVE_INTERVAL_SECONDS: f64 = 15.0;

// Loot
pub const LOOT_LUCK_COEFFICIENT: f64 = 0.02;
pub const LOOT_LEVEL_FACTOR_CAP: f64 = 2.0;
pub const LOOT_LEVEL_FACTOR_FLOOR: f64 = 0.25;
pub const COIN_DROP_CHANCE: f64 = 0.9;
pub const COIN_PLAYER_LEVEL_BONUS: u32 = 1;
pub const GENERIC_TABLE_EXTRA_CHANCE: f64 = 0.25;
pub const LEGENDARY_BRANCH_BASE_CHANCE: f64 = 0.0005;
pub const LEGENDARY_BRANCH_MAX_CHANCE: f64 = 0.02;

// Regional spawning
pub const ACTIVE_ENEMY_CAP: usize = 8;
pub const SPAWN_LEVEL_WINDOW: u32 = 2;
pub const SPAWN_CHECK_INTERVAL_SECONDS: f64 = 30.0;
pub const SPAWN_BASE_CHANCE: f64 = 0.3;
pub const SPAWN_MAX_CHANCE: f64 = 0.6;
pub const SETTLEMENT_SPAWN_FACTOR: f64 = 0.1;
pub const BONUS_SPAWN_MODIFIER_THRESHOLD: f64 = 1.5;
pub const BONUS_SPAWN_CHANCE: f64 = 0.15;
pub const DEFAULT_RESPAWN_DELAY_SECONDS: f64 = 300.0;
