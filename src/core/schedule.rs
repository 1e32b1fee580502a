//! The fixed-step schedule and the ordering of its system sets.

use bevy::ecs::schedule::ScheduleLabel;
use bevy::prelude::*;

/// Schedule holding one deterministic logic tick.
///
/// It is never run by the main loop directly. The game-loop driver runs it
/// zero or more times per frame depending on the accumulated frame time.
#[derive(ScheduleLabel, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimulationTick;

/// Ordered phases of a logic tick.
///
/// Configured as a chain, so every system of one phase sees the writes of
/// all earlier phases within the same tick.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Advance the tick counter and simulation time
    Clock,
    /// AI decisions and intent processing
    Input,
    /// Integration, ground/wall contact, separation, projectile flight
    Physics,
    /// Hit/hurt box rebuild and overlap detection
    Collision,
    /// State machine, hit resolution and battle end
    Combat,
    /// Clip selection, frame advance, visual modifiers
    Animation,
    /// Pool-backed visual effects, particles and texts
    Effects,
    /// HUD state and render snapshot
    Publish,
}
