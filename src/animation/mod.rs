//! Animation module - tick-counted clips, visual modifiers and the sprite catalog.

mod catalog;
mod components;
mod plugin;
mod systems;

pub use catalog::*;
pub use components::*;
pub use plugin::AnimationPlugin;
pub use systems::*;
