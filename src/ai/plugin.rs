//! AI plugin - computer-controlled fighters.

use bevy::prelude::*;

use super::systems::drive_ai;
use crate::core::{SimSet, SimulationTick};
use crate::input::apply_intents;

pub struct AiPlugin;

impl Plugin for AiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            SimulationTick,
            drive_ai.before(apply_intents).in_set(SimSet::Input),
        );
    }
}
