//! Battle state definitions.
//!
//! The state decides whether the fixed-step driver advances the simulation.
//! Entering `Fighting` spawns a fresh pair of fighters, entering `Ended`
//! releases every pooled object.

use bevy::prelude::*;

/// Lifecycle of a single battle.
///
/// - Start in `Idle` with no fighters
/// - `Fighting` while the fixed-step loop is running
/// - `Ended` once a fighter is knocked out, the round timer expires or
///   the battle is aborted from outside
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum BattleState {
    /// No battle configured yet
    #[default]
    Idle,
    /// Simulation ticking
    Fighting,
    /// Battle over, pools drained, report available
    Ended,
}
