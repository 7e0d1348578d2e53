//! Error types. Display strings are shown to the player as-is.

use thiserror::Error;

use crate::enemies::EnemyId;

/// A combat command that was rejected. No state changes when one of these
/// is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombatError {
    #[error("It is not your turn to act.")]
    NotPlayersTurn,
    #[error("The fight waits for your command.")]
    AwaitingPlayerAction,
    #[error("That foe is not part of this fight.")]
    TargetNotInCombat(EnemyId),
    #[error("The fight is already over.")]
    SessionOver,
    #[error("You don't know of any item called '{0}'.")]
    UnknownItem(String),
    #[error("You don't have any {0}.")]
    ItemNotInInventory(String),
    #[error("You can't use {0} in a fight.")]
    ItemNotUsable(String),
    #[error("{skill} needs {laps} more turn(s) to recover.")]
    SkillOnCooldown { skill: &'static str, laps: u32 },
    #[error("There is nobody here to fight.")]
    NoEnemies,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EffectError {
    #[error("unknown status effect '{0}'")]
    UnknownEffect(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
