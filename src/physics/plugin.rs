//! Physics plugin - integration, arena bounds, separation and projectile flight.

use bevy::prelude::*;

use super::systems::*;
use crate::core::{SimSet, SimulationTick};

pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            SimulationTick,
            (integrate_bodies, separate_fighters, move_projectiles)
                .chain()
                .in_set(SimSet::Physics),
        );
    }
}
