//! Shared plumbing: balance constants, configuration, errors, events and time.

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod time;

pub use config::*;
pub use error::*;
pub use events::*;
