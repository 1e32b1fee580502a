//! Game loop - fixed-timestep driving of the `SimulationTick` schedule.
//!
//! Real frames feed an accumulator; every full timestep runs one tick.
//! The memory sweep and performance sampling happen between ticks, never
//! inside one.

mod accumulator;
mod lifecycle;
mod plugin;

pub use accumulator::GameLoop;
pub use lifecycle::*;
pub use plugin::GameLoopPlugin;
