//! Snapshot plugin - publishes the render view at the end of every tick.

use bevy::prelude::*;

use super::systems::{publish_snapshot, RenderSnapshot};
use crate::core::{SimSet, SimulationTick};
use crate::entities::update_hud;

pub struct SnapshotPlugin;

impl Plugin for SnapshotPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RenderSnapshot>().add_systems(
            SimulationTick,
            publish_snapshot.after(update_hud).in_set(SimSet::Publish),
        );
    }
}
