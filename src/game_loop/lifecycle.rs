//! Battle lifecycle: start, stop and the per-frame driver.

use bevy::prelude::*;
use bevy::utils::Instant;

use super::accumulator::GameLoop;
use crate::collision::CollisionWorld;
use crate::combat::RoundTimer;
use crate::config::BattleConfig;
use crate::core::{BattleReport, BattleState, CombatRng, SimClock, SimulationTick};
use crate::entities::{despawn_fighters, spawn_fighter, Arena, Facing, Fighter, Side};
use crate::perf::{PerformanceMonitor, QualityChanged, QualityTier};
use crate::pool::{MemorySweep, ObjectPools};
use crate::snapshot::RenderSnapshot;

/// Queue a battle with `config`. Fighters spawn on the next `App::update`.
pub fn start_battle(world: &mut World, config: BattleConfig) {
    world.insert_resource(config);
    request_battle_start(world);
}

/// Queue a battle with whatever `BattleConfig` is already loaded.
pub fn request_battle_start(world: &mut World) {
    world
        .resource_mut::<NextState<BattleState>>()
        .set(BattleState::Fighting);
}

/// Abort the running battle from outside. No `BattleEnded` is sent.
pub fn request_end_battle(world: &mut World) {
    world.resource_mut::<GameLoop>().stop();
    world
        .resource_mut::<NextState<BattleState>>()
        .set(BattleState::Ended);
    info!("Battle aborted");
}

/// Run up to `ticks` simulation ticks right now, bypassing the accumulator.
/// Stops early once the battle is over. Returns the number of ticks run.
pub fn run_ticks(world: &mut World, ticks: u32) -> u32 {
    let mut ran = 0;
    for _ in 0..ticks {
        if !world.resource::<GameLoop>().is_running() {
            break;
        }
        run_tick(world);
        ran += 1;
    }
    ran
}

/// One full tick, then the memory sweep if it is due.
fn run_tick(world: &mut World) {
    world.run_schedule(SimulationTick);

    world.resource_scope(|world, mut sweep: Mut<MemorySweep>| {
        let now_ms = world.resource::<SimClock>().now_ms();
        let mut pools = world.resource_mut::<ObjectPools>();
        if let Some(outcome) = sweep.maybe_run(&mut pools, now_ms) {
            debug!("Memory sweep at {:.0} ms: {:?}", now_ms, outcome);
            let memory_mb = sweep.last_estimate_mb();
            let real_ms = real_elapsed_ms(world);
            let previous = world.resource::<PerformanceMonitor>().tier();
            let changed = world
                .resource_mut::<PerformanceMonitor>()
                .track_memory(memory_mb, real_ms);
            if let Some(tier) = changed {
                apply_quality(world, previous, tier);
            }
        }
    });
}

fn real_elapsed_ms(world: &World) -> f64 {
    world.resource::<Time<Real>>().elapsed().as_secs_f64() * 1000.0
}

fn apply_quality(world: &mut World, from: QualityTier, to: QualityTier) {
    let ceiling = to.preset().growth_ceiling;
    world.resource_mut::<ObjectPools>().set_growth_ceiling(ceiling);
    world.send_event(QualityChanged { from, to });
}

/// Exclusive per-frame driver: feed the real frame delta to the
/// accumulator, run the due ticks and sample performance.
pub fn drive_simulation(world: &mut World) {
    let delta_ms = world.resource::<Time<Real>>().delta().as_secs_f64() * 1000.0;
    let ticks = {
        let mut game_loop = world.resource_mut::<GameLoop>();
        if !game_loop.is_running() {
            return;
        }
        game_loop.accumulate(delta_ms)
    };

    let started = Instant::now();
    run_ticks(world, ticks);
    let frame_ms = started.elapsed().as_secs_f64() * 1000.0;

    let alpha = world.resource::<GameLoop>().alpha();
    world.resource_mut::<RenderSnapshot>().alpha = alpha;

    let now_ms = real_elapsed_ms(world);
    let previous = world.resource::<PerformanceMonitor>().tier();
    let changed = world
        .resource_mut::<PerformanceMonitor>()
        .record_frame(frame_ms, delta_ms, now_ms);
    if let Some(tier) = changed {
        apply_quality(world, previous, tier);
    }
}

/// Reset every per-battle resource and spawn both fighters.
#[allow(clippy::too_many_arguments)]
pub fn begin_battle(
    mut commands: Commands,
    config: Res<BattleConfig>,
    mut clock: ResMut<SimClock>,
    mut rng: ResMut<CombatRng>,
    mut arena: ResMut<Arena>,
    mut timer: ResMut<RoundTimer>,
    mut report: ResMut<BattleReport>,
    mut pools: ResMut<ObjectPools>,
    mut collision: ResMut<CollisionWorld>,
    mut sweep: ResMut<MemorySweep>,
    mut game_loop: ResMut<GameLoop>,
    old_fighters: Query<Entity, With<Fighter>>,
) {
    despawn_fighters(&mut commands, &old_fighters);
    collision.clear(&mut pools);
    pools.release_all();

    clock.reset();
    rng.reseed(config.seed);
    *arena = Arena::from(config.arena);
    *timer = RoundTimer::from_secs(config.round_time_secs);
    report.outcome = None;
    sweep.reset();

    spawn_fighter(
        &mut commands,
        &config.player,
        Side::Player,
        config.player_spawn(),
        Facing::Right,
        config.player_ai,
    );
    spawn_fighter(
        &mut commands,
        &config.boss,
        Side::Boss,
        config.boss_spawn(),
        Facing::Left,
        Some(config.boss_ai),
    );

    game_loop.start();
    info!(
        "Battle started: {} vs {} (seed {})",
        config.player.name, config.boss.name, config.seed
    );
}

/// Drain the pools once the battle is over.
pub fn finish_battle(
    mut pools: ResMut<ObjectPools>,
    mut collision: ResMut<CollisionWorld>,
    mut game_loop: ResMut<GameLoop>,
    report: Res<BattleReport>,
) {
    game_loop.stop();
    collision.clear(&mut pools);
    let released = pools.release_all();

    for (pool_type, stats) in pools.stats() {
        debug!(
            "{} pool: {} acquired, reuse rate {:.2}, peak {}",
            pool_type.name(),
            stats.acquired,
            stats.reuse_rate(),
            stats.peak_active
        );
    }
    match &report.outcome {
        Some(outcome) => info!(
            "Battle ended ({}), score {}; released {} pooled objects",
            if outcome.victory { "victory" } else { "defeat" },
            outcome.score,
            released
        ),
        None => info!("Battle ended without a result; released {} pooled objects", released),
    }
}
