//! Collision plugin - hit/hurt box rebuild and detection.

use bevy::prelude::*;

use super::systems::*;
use crate::core::{SimSet, SimulationTick};

pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CollisionWorld>()
            .add_event::<HitEvent>()
            .add_event::<ClashEvent>()
            .add_systems(
                SimulationTick,
                (rebuild_boxes, detect_hits)
                    .chain()
                    .in_set(SimSet::Collision),
            );
    }
}
