//! Skirmish - turn-based combat and encounter simulation engine
//!
//! The engine resolves fights between a player and the enemies sharing their
//! room, ticks timed status effects, rolls loot and keeps regions populated.
//! It owns no presentation: every line of narration leaves through an
//! [`core::events::EventSink`] supplied by the host.

pub mod combat;
pub mod core;
pub mod effects;
pub mod enemies;
pub mod entity;
pub mod items;
pub mod loot;
pub mod spawn;
pub mod world;
