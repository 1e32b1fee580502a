//! Frame-gated hit/hurt box collision.
//!
//! Geometry is rebuilt from scratch every tick into flat arrays; there is
//! no physics engine involved.

mod boxes;
mod plugin;
mod systems;

pub use boxes::*;
pub use plugin::CollisionPlugin;
pub use systems::*;
