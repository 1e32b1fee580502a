//! Input plugin - intent events, input history and held controls.

use bevy::prelude::*;

use super::combos::PatternDetected;
use super::components::IntentEvent;
use super::systems::*;
use crate::core::{SimSet, SimulationTick};

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<IntentEvent>()
            .add_event::<PatternDetected>()
            .add_systems(
                SimulationTick,
                (apply_intents, apply_controls)
                    .chain()
                    .in_set(SimSet::Input),
            );
    }
}
