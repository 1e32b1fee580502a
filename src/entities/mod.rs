//! Fighter components, pool-resident records, the arena and the HUD.

mod components;
mod hud;
mod plugin;
mod records;
mod spawning;

pub use components::*;
pub use hud::*;
pub use plugin::EntitiesPlugin;
pub use records::*;
pub use spawning::*;
