//! Enemies: data model, AI decisions and the roster that owns them.

mod ai;
mod roster;
mod types;

pub use ai::*;
pub use roster::*;
pub use types::*;
