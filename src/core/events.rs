//! Events emitted by the simulation for the presentation layer.
//!
//! The engine never prints or renders anything. Every narrative line, defeat
//! notification and game-over signal is pushed into an [`EventSink`] that the
//! host supplies, and the host decides how to display or record it.

use crate::items::ItemStack;

/// Display colour hint attached to narrative lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
    Danger,
    Loot,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A line of combat or world narration.
    Narrative { message: String, tone: Tone },

    /// An enemy died. Consumed by quest, journal and bestiary tracking.
    EnemyDefeated {
        enemy_name: String,
        damage_dealt: u32,
        damage_taken: u32,
        experience: u32,
    },

    /// Loot was generated for a defeated enemy.
    LootDropped {
        enemy_name: String,
        coins: u32,
        items: Vec<ItemStack>,
    },

    /// The player reached a new level.
    LevelUp { level: u32 },

    /// The player died.
    GameOver { cause: String },
}

impl GameEvent {
    pub fn narrative(message: impl Into<String>, tone: Tone) -> Self {
        GameEvent::Narrative {
            message: message.into(),
            tone,
        }
    }
}

/// Receiver for [`GameEvent`]s.
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl dyn EventSink + '_ {
    /// Shorthand for emitting a [`GameEvent::Narrative`].
    pub fn say(&mut self, message: impl Into<String>, tone: Tone) {
        self.emit(GameEvent::narrative(message, tone));
    }
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Collects just the narrative text out of a batch of events.
pub fn messages(events: &[GameEvent]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|event| match event {
            GameEvent::Narrative { message, .. } => Some(message.as_str()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects_in_order() {
        let mut events: Vec<GameEvent> = Vec::new();
        {
            let sink: &mut dyn EventSink = &mut events;
            sink.say("first", Tone::Info);
            sink.emit(GameEvent::LevelUp { level: 2 });
            sink.say("second", Tone::Danger);
        }

        assert_eq!(events.len(), 3);
        assert_eq!(messages(&events), vec!["first", "second"]);
    }
}
