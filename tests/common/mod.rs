#![allow(dead_code)]

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use brawl_core::config::BattleConfig;
use brawl_core::entities::{Body, Fighter, Health, Side};
use brawl_core::game_loop::start_battle;
use brawl_core::BrawlCorePlugin;

/// Headless app with a battle queued and its fighters spawned.
///
/// Frames carry `frame` of real time, so `App::update` only ticks the
/// simulation when `frame` is non-zero.
pub fn battle_app_with_frame(config: BattleConfig, frame: Duration) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, BrawlCorePlugin::default()))
        .insert_resource(TimeUpdateStrategy::ManualDuration(frame));
    start_battle(app.world_mut(), config);
    app.update();
    app
}

/// Battle app whose frames never advance the simulation on their own.
pub fn battle_app(config: BattleConfig) -> App {
    battle_app_with_frame(config, Duration::ZERO)
}

pub fn fighter_entity(app: &mut App, side: Side) -> Entity {
    let mut query = app.world_mut().query::<(Entity, &Fighter)>();
    query
        .iter(app.world())
        .find(|(_, fighter)| fighter.side == side)
        .map(|(entity, _)| entity)
        .expect("fighter spawned")
}

pub fn body(app: &App, entity: Entity) -> Body {
    app.world().get::<Body>(entity).expect("body").clone()
}

pub fn health(app: &App, entity: Entity) -> f32 {
    app.world().get::<Health>(entity).expect("health").current
}
