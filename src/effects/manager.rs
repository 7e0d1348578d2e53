use serde::{Deserialize, Serialize};

use super::types::{StatusEffect, StatusEffectKind, StatusEffectRecord};
use crate::core::config::EffectConfig;
use crate::core::error::EffectError;
use crate::core::events::{EventSink, Tone};
use crate::entity::Combatant;

/// Tracks the timed effects on one entity (the player).
///
/// At most one effect per kind is active. Reapplying refreshes the existing
/// effect instead of stacking a second copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEffectManager {
    config: EffectConfig,
    effects: Vec<StatusEffect>,
}

impl StatusEffectManager {
    pub fn new(config: EffectConfig) -> Self {
        Self {
            config,
            effects: Vec::new(),
        }
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// Adds an effect, replacing any active effect of the same kind.
    pub fn add_effect(&mut self, effect: StatusEffect) {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == effect.kind) {
            log::trace!("refreshing {} (duration {})", effect.name(), effect.duration);
            *existing = effect;
        } else {
            log::trace!("applying {} (duration {})", effect.name(), effect.duration);
            self.effects.push(effect);
        }
    }

    /// Builds and adds an effect using this manager's tick cadence.
    pub fn apply(&mut self, kind: StatusEffectKind, duration: f64, strength: f64, now: f64) {
        let effect = StatusEffect::new(kind, duration, strength, now, &self.config);
        self.add_effect(effect);
    }

    /// Removes an effect outright (cures). Returns false if it wasn't active.
    pub fn remove_effect(&mut self, kind: StatusEffectKind) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| e.kind != kind);
        self.effects.len() != before
    }

    pub fn is_active(&self, kind: StatusEffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusEffectKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn active_names(&self) -> Vec<&'static str> {
        self.effects.iter().map(StatusEffect::name).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Expires finished effects and fires due ticks against `target`.
    /// Returns the total health lost this update.
    pub fn update(
        &mut self,
        now: f64,
        target: &mut dyn Combatant,
        events: &mut dyn EventSink,
    ) -> i32 {
        let mut total_damage = 0;
        let message_interval = self.config.bleeding_health_message_interval;

        self.effects.retain_mut(|effect| {
            if effect.is_expired(now) {
                on_removed(effect.kind, events);
                return false;
            }
            if !effect.is_tick_due(now) || !target.is_alive() {
                return true;
            }

            effect.last_tick_time = now;
            let lost = target.entity_mut().lose_health(effect.tick_damage());
            total_damage += lost;

            let entity = target.entity();
            match effect.kind {
                StatusEffectKind::Poison => {
                    events.say(
                        format!(
                            "Poison burns through your veins! (-{lost}, {}/{})",
                            entity.health, entity.max_health
                        ),
                        Tone::Danger,
                    );
                }
                StatusEffectKind::Bleeding => {
                    let message_due = effect
                        .last_message_time
                        .map_or(true, |last| now >= last + message_interval);
                    if message_due {
                        effect.last_message_time = Some(now);
                        events.say(
                            format!(
                                "You are bleeding. ({}/{})",
                                entity.health, entity.max_health
                            ),
                            Tone::Danger,
                        );
                    }
                }
            }
            true
        });

        total_damage
    }

    /// Persisted form of every active effect.
    pub fn to_records(&self, now: f64) -> Vec<StatusEffectRecord> {
        self.effects.iter().map(|e| e.to_record(now)).collect()
    }

    /// Replaces the active effects with persisted ones. Records with unknown
    /// names are rejected and nothing is changed.
    pub fn restore(&mut self, records: &[StatusEffectRecord], now: f64) -> Result<(), EffectError> {
        let restored = records
            .iter()
            .map(|record| StatusEffect::from_record(record, now, &self.config))
            .collect::<Result<Vec<_>, _>>()?;
        self.effects.clear();
        for effect in restored {
            self.add_effect(effect);
        }
        Ok(())
    }
}

fn on_removed(kind: StatusEffectKind, events: &mut dyn EventSink) {
    let message = match kind {
        StatusEffectKind::Poison => "The poison has worn off.",
        StatusEffectKind::Bleeding => "Your bleeding has stopped.",
    };
    events.say(message, Tone::Success);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::{messages, GameEvent};
    use crate::entity::Entity;

    fn setup() -> (StatusEffectManager, Entity, Vec<GameEvent>) {
        (
            StatusEffectManager::new(EffectConfig::default()),
            Entity::new("Hero", 50, 5, 10),
            Vec::new(),
        )
    }

    #[test]
    fn test_poison_ticks_on_interval() {
        let (mut manager, mut hero, mut events) = setup();
        manager.apply(StatusEffectKind::Poison, 30.0, 2.0, 0.0);

        assert_eq!(manager.update(4.0, &mut hero, &mut events), 0);
        assert_eq!(hero.health, 50);

        assert_eq!(manager.update(5.0, &mut hero, &mut events), 2);
        assert_eq!(hero.health, 48);

        // Same instant again: not due.
        assert_eq!(manager.update(5.0, &mut hero, &mut events), 0);
    }

    #[test]
    fn test_poison_ignores_defense() {
        let (mut manager, mut hero, mut events) = setup();
        manager.apply(StatusEffectKind::Poison, 30.0, 3.0, 0.0);
        manager.update(5.0, &mut hero, &mut events);
        assert_eq!(hero.health, 47);
    }

    #[test]
    fn test_reapply_refreshes_instead_of_stacking() {
        let (mut manager, mut hero, mut events) = setup();
        manager.apply(StatusEffectKind::Poison, 10.0, 2.0, 0.0);
        manager.apply(StatusEffectKind::Poison, 10.0, 2.0, 3.0);

        assert_eq!(manager.active_names(), vec!["poison"]);
        assert_eq!(manager.get(StatusEffectKind::Poison).unwrap().start_time, 3.0);

        // The refreshed effect restarts its tick clock at t=3.
        assert_eq!(manager.update(5.0, &mut hero, &mut events), 0);
        assert_eq!(manager.update(8.0, &mut hero, &mut events), 2);
    }

    #[test]
    fn test_expiry_removes_and_reports() {
        let (mut manager, mut hero, mut events) = setup();
        manager.apply(StatusEffectKind::Poison, 6.0, 2.0, 0.0);
        manager.update(6.0, &mut hero, &mut events);

        assert!(manager.is_empty());
        assert_eq!(hero.health, 50);
        assert_eq!(messages(&events), vec!["The poison has worn off."]);
    }

    #[test]
    fn test_bleeding_throttles_messages() {
        let (mut manager, mut hero, mut events) = setup();
        manager.apply(StatusEffectKind::Bleeding, 60.0, 1.0, 0.0);

        for t in 1..=6 {
            manager.update(t as f64, &mut hero, &mut events);
        }

        // Damage every second, message at t=1 and t=4 only.
        assert_eq!(hero.health, 44);
        assert_eq!(messages(&events).len(), 2);
    }

    #[test]
    fn test_remove_effect() {
        let (mut manager, _, _) = setup();
        manager.apply(StatusEffectKind::Bleeding, 10.0, 1.0, 0.0);
        assert!(manager.remove_effect(StatusEffectKind::Bleeding));
        assert!(!manager.remove_effect(StatusEffectKind::Bleeding));
        assert!(!manager.is_active(StatusEffectKind::Bleeding));
    }

    #[test]
    fn test_restore_rejects_unknown_records() {
        let (mut manager, _, _) = setup();
        manager.apply(StatusEffectKind::Poison, 10.0, 1.0, 0.0);
        let bad = StatusEffectRecord {
            name: "frostbite".to_string(),
            duration: 10.0,
            strength: 1.0,
            start_time: 0.0,
            remaining_time: 5.0,
        };
        assert!(manager.restore(&[bad], 20.0).is_err());
        assert!(manager.is_active(StatusEffectKind::Poison));
    }

    #[test]
    fn test_records_round_trip_through_restore() {
        let (mut manager, _, _) = setup();
        manager.apply(StatusEffectKind::Poison, 30.0, 2.0, 0.0);
        manager.apply(StatusEffectKind::Bleeding, 10.0, 1.0, 5.0);
        let records = manager.to_records(8.0);

        let mut loaded = StatusEffectManager::new(EffectConfig::default());
        loaded.restore(&records, 1000.0).unwrap();
        let poison = loaded.get(StatusEffectKind::Poison).unwrap();
        assert_eq!(poison.remaining_time(1000.0), 22.0);
        let bleeding = loaded.get(StatusEffectKind::Bleeding).unwrap();
        assert_eq!(bleeding.remaining_time(1000.0), 7.0);
    }
}
