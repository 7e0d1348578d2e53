//! Region-scoped, level-scaled enemy spawning.

mod regions;
mod spawner;
mod types;

pub use regions::*;
pub use spawner::*;
pub use types::*;
