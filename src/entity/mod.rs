//! Entity model shared by the player and enemies.

mod player;
mod types;

pub use player::*;
pub use types::*;
