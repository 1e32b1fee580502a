//! Input module - abstract intents, input history and combo patterns.
//!
//! The core never sees keys or gestures; hosts and the AI send
//! `IntentEvent`s, which are applied at the start of every tick.

mod combos;
mod components;
mod plugin;
mod systems;

pub use combos::*;
pub use components::*;
pub use plugin::InputPlugin;
pub use systems::*;
