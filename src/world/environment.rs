//! Ambient conditions that nudge combat and spawning numbers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeOfDay {
    #[default]
    Day,
    Dusk,
    Night,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Fog,
    Storm,
}

/// Additive modifiers applied on top of base chances and damage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub accuracy_modifier: f64,
    pub attack_modifier: i32,
    pub flee_modifier: f64,
    /// Multiplier on spawn probability.
    pub spawn_modifier: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            accuracy_modifier: 0.0,
            attack_modifier: 0,
            flee_modifier: 0.0,
            spawn_modifier: 1.0,
        }
    }
}

impl Environment {
    pub fn from_conditions(time: TimeOfDay, weather: Weather) -> Self {
        let mut env = Self::default();
        match time {
            TimeOfDay::Day => {}
            TimeOfDay::Dusk => {
                env.accuracy_modifier -= 0.05;
                env.spawn_modifier *= 1.2;
            }
            TimeOfDay::Night => {
                env.accuracy_modifier -= 0.1;
                env.flee_modifier += 0.1;
                env.spawn_modifier *= 1.5;
            }
        }
        match weather {
            Weather::Clear => {}
            Weather::Rain => {
                env.accuracy_modifier -= 0.05;
                env.spawn_modifier *= 0.9;
            }
            Weather::Fog => {
                env.accuracy_modifier -= 0.15;
                env.flee_modifier += 0.15;
            }
            Weather::Storm => {
                env.accuracy_modifier -= 0.1;
                env.attack_modifier -= 1;
                env.spawn_modifier *= 0.7;
            }
        }
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_day_is_neutral() {
        assert_eq!(
            Environment::from_conditions(TimeOfDay::Day, Weather::Clear),
            Environment::default()
        );
    }

    #[test]
    fn test_foggy_night_stacks() {
        let env = Environment::from_conditions(TimeOfDay::Night, Weather::Fog);
        assert!((env.accuracy_modifier + 0.25).abs() < 1e-9);
        assert!((env.flee_modifier - 0.25).abs() < 1e-9);
        assert!((env.spawn_modifier - 1.5).abs() < 1e-9);
    }
}
