//! Timed status effects (poison, bleeding) and their manager.

mod manager;
mod types;

pub use manager::*;
pub use types::*;
