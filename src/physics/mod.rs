//! Fixed-step kinematics for fighters and projectiles.

mod plugin;
mod systems;

pub use plugin::PhysicsPlugin;
pub use systems::*;
