//! Combat plugin - move frames, hit resolution and the round timer.

use bevy::prelude::*;

use super::components::RoundTimer;
use super::systems::*;
use crate::core::{SimSet, SimulationTick};

/// Combat plugin - handles all combat systems.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RoundTimer>().add_systems(
            SimulationTick,
            (
                tick_combat_states,
                tick_breakers,
                apply_clashes,
                launch_projectiles,
                expire_combos,
                resolve_hits,
                check_battle_end,
            )
                .chain()
                .in_set(SimSet::Combat),
        );
    }
}
