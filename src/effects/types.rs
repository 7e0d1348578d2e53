use serde::{Deserialize, Serialize};

use crate::core::config::EffectConfig;
use crate::core::error::EffectError;

/// The closed set of timed effects the engine knows how to tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatusEffectKind {
    Poison,
    Bleeding,
}

impl StatusEffectKind {
    pub fn name(&self) -> &'static str {
        match self {
            StatusEffectKind::Poison => "poison",
            StatusEffectKind::Bleeding => "bleeding",
        }
    }

    /// Parses a persisted effect name. Unknown names are rejected.
    pub fn from_name(name: &str) -> Result<Self, EffectError> {
        match name.to_ascii_lowercase().as_str() {
            "poison" | "poisoned" => Ok(StatusEffectKind::Poison),
            "bleeding" | "bleed" => Ok(StatusEffectKind::Bleeding),
            _ => Err(EffectError::UnknownEffect(name.to_string())),
        }
    }

    pub fn tick_interval(&self, config: &EffectConfig) -> f64 {
        match self {
            StatusEffectKind::Poison => config.poison_tick_interval,
            StatusEffectKind::Bleeding => config.bleeding_tick_interval,
        }
    }
}

/// An active timed effect on an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusEffectKind,
    pub duration: f64,
    /// Intensity. Damage per tick for poison and bleeding.
    pub strength: f64,
    pub start_time: f64,
    pub last_tick_time: f64,
    pub tick_interval: f64,
    /// Last time a health message was surfaced (bleeding throttle).
    #[serde(default)]
    pub last_message_time: Option<f64>,
}

impl StatusEffect {
    pub fn new(
        kind: StatusEffectKind,
        duration: f64,
        strength: f64,
        now: f64,
        config: &EffectConfig,
    ) -> Self {
        Self {
            kind,
            duration: duration.max(0.0),
            strength: strength.max(0.0),
            start_time: now,
            last_tick_time: now,
            tick_interval: kind.tick_interval(config),
            last_message_time: None,
        }
    }

    /// Builds an effect from a persisted or data-driven name.
    pub fn from_name(
        name: &str,
        duration: f64,
        strength: f64,
        now: f64,
        config: &EffectConfig,
    ) -> Result<Self, EffectError> {
        let kind = StatusEffectKind::from_name(name)?;
        Ok(Self::new(kind, duration, strength, now, config))
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn expires_at(&self) -> f64 {
        self.start_time + self.duration
    }

    pub fn is_expired(&self, now: f64) -> bool {
        now >= self.expires_at()
    }

    /// A tick is due once a full interval has passed, and only before expiry.
    pub fn is_tick_due(&self, now: f64) -> bool {
        !self.is_expired(now) && now >= self.last_tick_time + self.tick_interval
    }

    pub fn remaining_time(&self, now: f64) -> f64 {
        (self.expires_at() - now).max(0.0)
    }

    /// Health lost per tick.
    pub fn tick_damage(&self) -> i32 {
        (self.strength.round() as i32).max(1)
    }

    pub fn to_record(&self, now: f64) -> StatusEffectRecord {
        StatusEffectRecord {
            name: self.name().to_string(),
            duration: self.duration,
            strength: self.strength,
            start_time: self.start_time,
            remaining_time: self.remaining_time(now),
        }
    }

    /// Rebuilds an effect saved with [`StatusEffect::to_record`]. The start
    /// time is shifted so the same amount of time remains at `now`.
    pub fn from_record(
        record: &StatusEffectRecord,
        now: f64,
        config: &EffectConfig,
    ) -> Result<Self, EffectError> {
        let kind = StatusEffectKind::from_name(&record.name)?;
        let mut effect = Self::new(kind, record.duration, record.strength, now, config);
        effect.start_time = now - (record.duration - record.remaining_time);
        Ok(effect)
    }
}

/// Persisted shape of a status effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffectRecord {
    pub name: String,
    pub duration: f64,
    pub strength: f64,
    pub start_time: f64,
    pub remaining_time: f64,
}
