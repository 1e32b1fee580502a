//! AI module - range-aware, seeded decision making that produces intents.

mod components;
mod plugin;
mod systems;

pub use components::*;
pub use plugin::AiPlugin;
pub use systems::drive_ai;
