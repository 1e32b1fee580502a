//! Hit sparks, dust, auras, afterimages, particles and damage numbers.
//!
//! Everything here is cosmetic and lives in the object pools. Nothing feeds
//! back into combat, so quality-tier gating cannot change a battle's result.

mod components;
mod plugin;
mod systems;

pub use components::*;
pub use plugin::EffectsPlugin;
pub use systems::*;
