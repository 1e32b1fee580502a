//! Per-tick render snapshot.
//!
//! The only thing a render layer needs to read. Rebuilt at the end of every
//! tick; the driver stamps the interpolation alpha after the frame's ticks.

mod plugin;
mod systems;

pub use plugin::SnapshotPlugin;
pub use systems::*;
