mod common;

use std::time::Duration;

use brawl_core::config::BattleConfig;
use brawl_core::core::SimClock;
use brawl_core::game_loop::GameLoop;
use brawl_core::perf::{PerformanceMonitor, QualityTier};
use brawl_core::snapshot::RenderSnapshot;

use common::*;

fn tick(app: &bevy::prelude::App) -> u64 {
    app.world().resource::<SimClock>().tick
}

#[test]
fn one_tick_per_sixty_hertz_frame() {
    let mut app = battle_app_with_frame(BattleConfig::default(), Duration::from_micros(16_667));
    assert_eq!(tick(&app), 0);

    for _ in 0..30 {
        app.update();
    }
    assert_eq!(tick(&app), 30);

    let alpha = app.world().resource::<RenderSnapshot>().alpha;
    assert!((0.0..1.0).contains(&alpha));
}

#[test]
fn slow_frames_are_clamped_to_two_ticks() {
    let mut app = battle_app_with_frame(BattleConfig::default(), Duration::from_millis(100));

    for _ in 0..5 {
        app.update();
    }
    assert_eq!(tick(&app), 10);
    assert!(app.world().resource::<GameLoop>().accumulator_ms() < 1.0);
}

#[test]
fn fast_frames_accumulate_before_ticking() {
    let mut app = battle_app_with_frame(BattleConfig::default(), Duration::from_millis(5));

    for _ in 0..3 {
        app.update();
    }
    assert_eq!(tick(&app), 0);
    app.update();
    assert_eq!(tick(&app), 1);
}

#[test]
fn frames_are_sampled_by_the_monitor() {
    let mut app = battle_app_with_frame(BattleConfig::default(), Duration::from_micros(16_667));

    for _ in 0..20 {
        app.update();
    }
    let monitor = app.world().resource::<PerformanceMonitor>();
    assert_eq!(monitor.tier(), QualityTier::High);
    assert!((monitor.stats().avg_fps - 60.0).abs() < 0.5);
}
