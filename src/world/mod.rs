//! The slice of the world the engine reads: room topology, locks, floor
//! items and ambient conditions.

mod environment;
mod graph;

pub use environment::*;
pub use graph::*;
