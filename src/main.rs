//! Brawl Core - headless demo
//!
//! Runs one AI-versus-AI battle from `assets/data/` at 60 Hz and logs the
//! outcome.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use brawl_core::core::BattleEnded;
use brawl_core::game_loop::request_battle_start;
use brawl_core::BrawlCorePlugin;

fn main() {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / 60.0,
        ))),
        LogPlugin::default(),
    ))
    .add_plugins(BrawlCorePlugin {
        data_dir: Some("assets/data".into()),
    })
    .add_systems(Update, exit_on_battle_end);

    request_battle_start(app.world_mut());
    app.run();
}

fn exit_on_battle_end(mut ended: EventReader<BattleEnded>, mut exit: EventWriter<AppExit>) {
    for event in ended.read() {
        let outcome = &event.outcome;
        info!(
            "{} with score {} (dealt {:.0}, taken {:.0}, best combo {}, {:.1} s)",
            if outcome.victory { "Victory" } else { "Defeat" },
            outcome.score,
            outcome.stats.damage_dealt,
            outcome.stats.damage_taken,
            outcome.stats.max_combo,
            outcome.stats.time_elapsed_ms / 1000.0
        );
        exit.send(AppExit::Success);
    }
}
