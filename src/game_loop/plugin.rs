//! Game loop plugin - pools, the fixed-step driver and battle lifecycle.

use bevy::prelude::*;

use super::accumulator::GameLoop;
use super::lifecycle::*;
use crate::core::BattleState;
use crate::pool::{MemorySweep, ObjectPools};

pub struct GameLoopPlugin;

impl Plugin for GameLoopPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameLoop>()
            .init_resource::<ObjectPools>()
            .init_resource::<MemorySweep>()
            .add_systems(OnEnter(BattleState::Fighting), begin_battle)
            .add_systems(OnEnter(BattleState::Ended), finish_battle)
            .add_systems(
                Update,
                drive_simulation.run_if(in_state(BattleState::Fighting)),
            );
    }
}
