//! Battle configuration and move frame data, built in code or loaded from RON.

mod battle;
mod error;
mod loader;
mod moves;
mod plugin;

pub use battle::*;
pub use error::ConfigError;
pub use loader::*;
pub use moves::*;
pub use plugin::ConfigPlugin;
