//! Item system: types, capability traits, equipment and the item catalog.

pub mod catalog;
pub mod equipment;
pub mod types;

pub use catalog::*;
pub use equipment::*;
pub use types::*;
