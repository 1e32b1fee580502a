//! Config plugin - battle and move data resources.

use bevy::prelude::*;

use super::battle::BattleConfig;
use super::loader::load_battle_data;
use super::moves::MoveLibrary;

/// Registers built-in data and, when a `DataDir` is present, replaces it
/// with the RON files at startup.
pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BattleConfig>()
            .init_resource::<MoveLibrary>()
            .add_systems(Startup, load_battle_data);
    }
}
