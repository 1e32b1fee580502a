//! Animation plugin - clips, visuals and effect lifetimes.

use bevy::prelude::*;

use super::catalog::{load_animation_catalog, AnimationCatalog};
use super::components::AnimationMarker;
use super::systems::*;
use crate::core::{SimSet, SimulationTick};

pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AnimationCatalog>()
            .add_event::<AnimationMarker>()
            .add_systems(Startup, load_animation_catalog)
            .add_systems(
                SimulationTick,
                (
                    animate_fighters,
                    apply_visual_modifiers,
                    animate_projectiles,
                    update_effects,
                )
                    .chain()
                    .in_set(SimSet::Animation),
            );
    }
}
