//! Core simulation module - states, schedules, the tick clock and global events.
//!
//! Every other plugin builds on the types defined here.

mod clock;
mod events;
mod plugin;
mod rng;
mod schedule;
mod states;

pub use clock::*;
pub use events::*;
pub use plugin::CorePlugin;
pub use rng::CombatRng;
pub use schedule::*;
pub use states::*;
