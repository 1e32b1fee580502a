//! Combat module - fighter state machine, damage rules and battle end.

mod components;
mod damage;
mod plugin;
mod systems;

pub use components::*;
pub use damage::*;
pub use plugin::CombatPlugin;
pub use systems::*;
