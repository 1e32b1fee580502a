//! Core plugin that sets up battle states, the tick schedule and global events.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use super::clock::*;
use super::events::*;
use super::rng::CombatRng;
use super::schedule::*;
use super::states::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - The battle state (Idle, Fighting, Ended)
/// - The `SimulationTick` schedule and its chained `SimSet` phases
/// - Global events (HitLanded, Countered, ComboBroken, BattleEnded)
/// - The simulation clock and the seeded RNG
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        // Headless apps built on MinimalPlugins have no state machinery yet
        if !app.is_plugin_added::<StatesPlugin>() {
            app.add_plugins(StatesPlugin);
        }

        app.init_state::<BattleState>()
            .init_schedule(SimulationTick)
            .configure_sets(
                SimulationTick,
                (
                    SimSet::Clock,
                    SimSet::Input,
                    SimSet::Physics,
                    SimSet::Collision,
                    SimSet::Combat,
                    SimSet::Animation,
                    SimSet::Effects,
                    SimSet::Publish,
                )
                    .chain(),
            )
            // Resources
            .init_resource::<SimClock>()
            .init_resource::<CombatRng>()
            .init_resource::<BattleReport>()
            // Events
            .add_event::<HitLanded>()
            .add_event::<Countered>()
            .add_event::<ComboBroken>()
            .add_event::<BattleEnded>()
            .add_systems(SimulationTick, advance_clock.in_set(SimSet::Clock));
    }
}
