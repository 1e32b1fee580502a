//! Performance monitoring and adaptive quality.
//!
//! The monitor is fed from the game loop driver once per real frame; it never
//! runs inside a simulation tick.

mod monitor;
mod plugin;

pub use monitor::*;
pub use plugin::PerfPlugin;
