//! Effects plugin - cosmetic records driven by combat events.

use bevy::prelude::*;

use super::systems::*;
use crate::core::{SimSet, SimulationTick};

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            SimulationTick,
            (
                spawn_hit_effects,
                spawn_clash_effects,
                spawn_dust,
                update_auras,
                spawn_afterimages,
                update_transients,
            )
                .chain()
                .in_set(SimSet::Effects),
        );
    }
}
