//! Brawl Core - a deterministic, headless fighting-game simulation in Bevy.
//!
//! Two fighters, frame-accurate hit and hurt boxes, a fixed 60 Hz tick and
//! pooled transient objects. The crate owns no window, renderer or input
//! device: hosts send `IntentEvent`s in and read `RenderSnapshot`,
//! `HitLanded` and `BattleEnded` out.
//!
//! # Architecture
//!
//! The simulation is organized into plugins, each handling one concern:
//!
//! - **Core**: Battle states, the `SimulationTick` schedule, clock, RNG, global events
//! - **Config**: Battle config and move frame data, built in or loaded from RON
//! - **Entities**: Fighter components, pooled records, arena, HUD
//! - **Input**: Intents, input history, combo patterns
//! - **AI**: Seeded decision making that produces intents
//! - **Physics**: Gravity, friction, arena bounds, separation, projectiles
//! - **Collision**: Hitbox/hurtbox geometry, clashes, hit detection
//! - **Combat**: State machine, damage, combos, battle end
//! - **Animation**: Clip selection, frame advance, visual modifiers
//! - **Effects**: Sparks, dust, auras, particles, damage numbers
//! - **Perf**: Frame sampling and quality tiers
//! - **Snapshot**: The per-tick render view
//! - **Game loop**: Fixed-timestep driver and battle lifecycle

pub mod ai;
pub mod animation;
pub mod collision;
pub mod combat;
pub mod config;
pub mod core;
pub mod effects;
pub mod entities;
pub mod game_loop;
pub mod input;
pub mod perf;
pub mod physics;
pub mod pool;
pub mod snapshot;

use std::path::PathBuf;

use bevy::prelude::*;

/// Main plugin that adds all sub-plugins.
///
/// With a `data_dir` the RON files in it replace the built-in battle, move
/// and animation data at startup.
#[derive(Default)]
pub struct BrawlCorePlugin {
    pub data_dir: Option<PathBuf>,
}

impl Plugin for BrawlCorePlugin {
    fn build(&self, app: &mut App) {
        if let Some(dir) = &self.data_dir {
            app.insert_resource(config::DataDir(dir.clone()));
        }

        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)
            .add_plugins(config::ConfigPlugin)
            .add_plugins(entities::EntitiesPlugin)
            // Per-tick phases, in tick order
            .add_plugins((
                input::InputPlugin,
                ai::AiPlugin,
                physics::PhysicsPlugin,
                collision::CollisionPlugin,
                combat::CombatPlugin,
                animation::AnimationPlugin,
                effects::EffectsPlugin,
                snapshot::SnapshotPlugin,
            ))
            // Driver
            .add_plugins(perf::PerfPlugin)
            .add_plugins(game_loop::GameLoopPlugin);
    }
}
