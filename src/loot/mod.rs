//! Tiered, luck- and level-scaled loot generation.

mod drops;
mod tables;
mod types;

pub use drops::*;
pub use tables::*;
pub use types::*;
