//! Turn-based combat: hit and damage math, session types and the turn engine.

mod math;
mod session;
mod types;

pub use math::*;
pub use session::*;
pub use types::*;
