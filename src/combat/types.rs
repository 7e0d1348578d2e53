use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::constants::*;
use crate::enemies::EnemyId;

/// One slot in the initiative order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Participant {
    Player,
    Enemy(EnemyId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitiativeEntry {
    pub participant: Participant,
    /// `d20 + initiative bonus`.
    pub roll: i32,
}

/// Where a combat session stands. Every variant except `Ongoing` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombatResult {
    #[default]
    Ongoing,
    PlayerVictory,
    PlayerDefeat,
    PlayerFled,
    /// The last enemy standing ran away.
    EnemyFled,
}

impl CombatResult {
    pub fn is_terminal(&self) -> bool {
        *self != CombatResult::Ongoing
    }
}

/// Player combat skills. Cooldowns are counted in completed laps of the
/// initiative order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    /// A heavy blow: more damage, less accuracy.
    PowerStrike,
    /// Recovers a quarter of max health.
    SecondWind,
    /// Temporary attack bonus.
    Focus,
}

impl Skill {
    pub const ALL: [Skill; 3] = [Skill::PowerStrike, Skill::SecondWind, Skill::Focus];

    pub fn name(&self) -> &'static str {
        match self {
            Skill::PowerStrike => "Power Strike",
            Skill::SecondWind => "Second Wind",
            Skill::Focus => "Focus",
        }
    }

    pub fn cooldown(&self) -> u32 {
        match self {
            Skill::PowerStrike => POWER_STRIKE_COOLDOWN,
            Skill::SecondWind => SECOND_WIND_COOLDOWN,
            Skill::Focus => FOCUS_COOLDOWN,
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A command for the player's turn.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerAction {
    Attack(EnemyId),
    UseItem(String),
    /// Power Strike lands on the current target: the enemy last attacked,
    /// or the first one in initiative order.
    UseSkill(Skill),
    Flee,
}
