//! Built-in regions and their spawn pools.

use super::types::{Region, RegionKind, SpawnTemplate, StatRange};
use crate::core::constants::DEFAULT_RESPAWN_DELAY_SECONDS;
use crate::enemies::{AiType, SpecialAttack, SpecialEffect};

/// Returns every built-in region.
pub fn builtin_regions() -> Vec<Region> {
    vec![greenvale(), whisperwood(), old_barrow(), millbrook()]
}

fn greenvale() -> Region {
    Region::new("greenvale", "Greenvale Fields", RegionKind::Wilderness, 1.0)
        .with_rooms(&["meadow", "crossroads", "old_mill_path", "riverbank"])
        .with_template(
            SpawnTemplate::new("Giant Rat", (1, 2), 3.0)
                .with_stats(StatRange::new(8, 12), StatRange::new(2, 4), StatRange::fixed(0))
                .with_experience(StatRange::new(5, 8))
                .with_ai(AiType::Cautious),
        )
        .with_template(
            SpawnTemplate::new("Wolf", (1, 4), 2.0)
                .with_stats(StatRange::new(14, 22), StatRange::new(4, 7), StatRange::new(0, 1))
                .with_experience(StatRange::new(10, 18))
                .with_ai(AiType::Aggressive)
                .with_drop_table("wolf")
                .with_special(
                    "savage_bite",
                    SpecialAttack::new(0.5, 1.2, "The wolf sinks its fangs deep!").with_effect(
                        SpecialEffect::Bleed {
                            strength: 1.0,
                            duration: 6.0,
                        },
                    ),
                ),
        )
        .with_template(
            SpawnTemplate::new("Goblin Scout", (2, 5), 2.0)
                .with_stats(StatRange::new(16, 24), StatRange::new(5, 8), StatRange::new(1, 2))
                .with_experience(StatRange::new(12, 22))
                .with_ai(AiType::Tactical)
                .with_drop_table("goblin"),
        )
}

fn whisperwood() -> Region {
    Region::new("whisperwood", "Whisperwood", RegionKind::Wilderness, 1.3)
        .with_rooms(&["forest_edge", "dark_thicket", "spider_hollow", "hunters_camp"])
        .with_template(
            SpawnTemplate::new("Cave Spider", (3, 6), 2.5)
                .with_stats(StatRange::new(18, 26), StatRange::new(5, 9), StatRange::new(1, 2))
                .with_experience(StatRange::new(18, 30))
                .with_drop_table("spider")
                .with_special(
                    "venom_fang",
                    SpecialAttack::new(0.6, 1.0, "The spider's fangs drip with venom!").with_effect(
                        SpecialEffect::Poison {
                            strength: 2.0,
                            duration: 20.0,
                        },
                    ),
                ),
        )
        .with_template(
            SpawnTemplate::new("Bandit", (4, 8), 2.0)
                .with_stats(StatRange::new(24, 36), StatRange::new(7, 11), StatRange::new(2, 3))
                .with_experience(StatRange::new(25, 45))
                .with_ai(AiType::Tactical)
                .with_drop_table("bandit")
                .with_special(
                    "dirty_trick",
                    SpecialAttack::new(0.4, 0.8, "The bandit throws grit in your eyes!").with_effect(
                        SpecialEffect::Weaken {
                            amount: 2,
                            duration: 10.0,
                        },
                    ),
                ),
        )
        .with_template(
            SpawnTemplate::new("Dire Wolf", (6, 9), 1.0)
                .with_stats(StatRange::new(34, 48), StatRange::new(9, 13), StatRange::new(2, 4))
                .with_experience(StatRange::new(40, 60))
                .with_ai(AiType::Berserker)
                .with_drop_table("wolf"),
        )
}

fn old_barrow() -> Region {
    Region::new("old_barrow", "The Old Barrow", RegionKind::Dungeon, 1.6)
        .with_rooms(&["barrow_entrance", "bone_hall", "crypt", "sunken_shrine"])
        .with_template(
            SpawnTemplate::new("Skeleton", (5, 9), 3.0)
                .with_stats(StatRange::new(28, 40), StatRange::new(8, 12), StatRange::new(3, 5))
                .with_experience(StatRange::new(30, 50))
                .with_ai(AiType::Stationary)
                .with_drop_table("skeleton")
                .with_respawn_delay(DEFAULT_RESPAWN_DELAY_SECONDS),
        )
        .with_template(
            SpawnTemplate::new("Barrow Wight", (7, 11), 1.5)
                .with_stats(StatRange::new(40, 58), StatRange::new(10, 15), StatRange::new(3, 6))
                .with_experience(StatRange::new(55, 85))
                .with_drop_table("skeleton")
                .with_special(
                    "life_drain",
                    SpecialAttack::new(0.5, 1.0, "The wight's touch drains your warmth!")
                        .with_effect(SpecialEffect::Drain { fraction: 0.5 }),
                ),
        )
        .with_template(
            SpawnTemplate::new("Cave Troll", (9, 12), 1.0)
                .with_stats(StatRange::new(70, 95), StatRange::new(13, 18), StatRange::new(4, 7))
                .with_experience(StatRange::new(90, 140))
                .with_ai(AiType::Berserker)
                .with_drop_table("troll")
                .with_special(
                    "crushing_blow",
                    SpecialAttack::new(0.35, 1.8, "The troll brings its club down with terrible force!"),
                ),
        )
}

fn millbrook() -> Region {
    Region::new("millbrook", "Millbrook Village", RegionKind::Settlement, 0.5)
        .with_rooms(&["village_square", "tavern", "market", "smithy"])
        .with_template(
            SpawnTemplate::new("Stray Dog", (1, 3), 1.0)
                .with_stats(StatRange::new(8, 12), StatRange::new(2, 4), StatRange::fixed(0))
                .with_experience(StatRange::new(3, 6))
                .with_ai(AiType::Cautious),
        )
        .with_template(
            SpawnTemplate::new("Pickpocket", (2, 6), 1.0)
                .with_stats(StatRange::new(14, 22), StatRange::new(3, 6), StatRange::new(1, 2))
                .with_experience(StatRange::new(8, 16))
                .with_drop_table("bandit"),
        )
}
