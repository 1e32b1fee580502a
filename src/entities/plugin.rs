//! Entities plugin - arena and HUD resources.

use bevy::prelude::*;

use super::components::Arena;
use super::hud::{update_hud, HudState};
use crate::core::{SimSet, SimulationTick};

pub struct EntitiesPlugin;

impl Plugin for EntitiesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Arena>()
            .init_resource::<HudState>()
            .add_systems(SimulationTick, update_hud.in_set(SimSet::Publish));
    }
}
