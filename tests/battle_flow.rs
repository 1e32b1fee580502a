mod common;

use bevy::prelude::*;

use brawl_core::combat::{CombatState, Combo, ComboBreaker, FighterState};
use brawl_core::config::{BattleConfig, Knockdown};
use brawl_core::core::{BattleReport, BattleState, ComboBroken, SimClock};
use brawl_core::entities::{Fighter, HudState, Side};
use brawl_core::game_loop::{request_end_battle, run_ticks, start_battle, GameLoop};
use brawl_core::input::{Intent, IntentEvent};
use brawl_core::pool::ObjectPools;
use brawl_core::snapshot::RenderSnapshot;

use common::*;

#[test]
fn battle_starts_with_two_fighters_on_the_floor() {
    let mut app = battle_app(BattleConfig::default());

    assert_eq!(
        *app.world().resource::<State<BattleState>>().get(),
        BattleState::Fighting
    );
    assert!(app.world().resource::<GameLoop>().is_running());

    let player = fighter_entity(&mut app, Side::Player);
    let boss = fighter_entity(&mut app, Side::Boss);
    assert_eq!(body(&app, player).position, Vec2::new(100.0, 300.0));
    assert_eq!(body(&app, boss).position, Vec2::new(700.0, 300.0));
    assert_eq!(health(&app, player), 100.0);
    assert_eq!(health(&app, boss), 100.0);
}

#[test]
fn round_timeout_ends_the_battle() {
    let config = BattleConfig {
        round_time_secs: 3.0,
        ..default()
    };
    let mut app = battle_app(config);

    // an idle player cannot out-damage the boss, so time runs out in defeat
    let ran = run_ticks(app.world_mut(), 1000);
    assert!(ran <= 181, "ran {ran} ticks");
    assert!(!app.world().resource::<GameLoop>().is_running());

    let outcome = app
        .world()
        .resource::<BattleReport>()
        .outcome
        .clone()
        .expect("battle report");
    assert!(!outcome.victory);
    assert!(outcome.stats.time_elapsed_ms <= 3020.0);

    let player = fighter_entity(&mut app, Side::Player);
    let state = app.world().get::<CombatState>(player).expect("combat").state;
    assert_eq!(state, FighterState::Defeat);

    app.update();
    assert_eq!(
        *app.world().resource::<State<BattleState>>().get(),
        BattleState::Ended
    );
    assert_eq!(app.world().resource::<ObjectPools>().total_active(), 0);
}

#[test]
fn no_ticks_run_after_the_battle_ends() {
    let config = BattleConfig {
        round_time_secs: 1.0,
        ..default()
    };
    let mut app = battle_app(config);
    run_ticks(app.world_mut(), 200);
    let tick = app.world().resource::<SimClock>().tick;

    assert_eq!(run_ticks(app.world_mut(), 50), 0);
    app.update();
    app.update();
    assert_eq!(app.world().resource::<SimClock>().tick, tick);
}

#[test]
fn punch_intent_runs_the_move_to_completion() {
    let mut app = battle_app(BattleConfig::default());
    let player = fighter_entity(&mut app, Side::Player);

    app.world_mut()
        .send_event(IntentEvent::press(Side::Player, Intent::Punch, 0.0));
    run_ticks(app.world_mut(), 1);
    let combat = app.world().get::<CombatState>(player).expect("combat").clone();
    assert_eq!(combat.state, FighterState::Attacking);
    assert_eq!(combat.current_attack.as_deref(), Some("punch"));
    assert_eq!(combat.attack_frame, 1);

    // 15 attack frames plus 10 recovery frames
    run_ticks(app.world_mut(), 30);
    let combat = app.world().get::<CombatState>(player).expect("combat");
    assert!(!combat.state.is_attacking());
    assert_ne!(combat.state, FighterState::Recovery);
    assert!(combat.current_attack.is_none());
}

#[test]
fn metered_special_needs_a_full_meter() {
    let mut app = battle_app(BattleConfig::default());
    let player = fighter_entity(&mut app, Side::Player);

    app.world_mut()
        .send_event(IntentEvent::press(Side::Player, Intent::Special, 0.0));
    run_ticks(app.world_mut(), 1);
    let combat = app.world().get::<CombatState>(player).expect("combat");
    assert_ne!(combat.state, FighterState::Special);
}

#[test]
fn hud_and_snapshot_follow_the_simulation() {
    let mut app = battle_app(BattleConfig::default());
    run_ticks(app.world_mut(), 10);

    let hud = app.world().resource::<HudState>();
    assert_eq!(hud.player.max_health, 100.0);
    assert_eq!(hud.boss.name, "Boss");
    assert_eq!(hud.time_remaining, 99);

    let snapshot = app.world().resource::<RenderSnapshot>();
    assert_eq!(snapshot.tick, 10);
    assert_eq!(snapshot.fighters.len(), 2);
    assert!(snapshot.fighter(Side::Player).is_some());
}

#[test]
fn aborting_a_battle_sends_no_result() {
    let mut app = battle_app(BattleConfig::default());
    run_ticks(app.world_mut(), 5);

    request_end_battle(app.world_mut());
    assert_eq!(run_ticks(app.world_mut(), 5), 0);
    app.update();

    assert_eq!(
        *app.world().resource::<State<BattleState>>().get(),
        BattleState::Ended
    );
    assert!(app.world().resource::<BattleReport>().outcome.is_none());
}

#[test]
fn restarting_replaces_the_fighters() {
    let mut app = battle_app(BattleConfig::default());
    run_ticks(app.world_mut(), 30);
    request_end_battle(app.world_mut());
    app.update();

    start_battle(app.world_mut(), BattleConfig::default());
    app.update();

    let mut fighters = app.world_mut().query::<&Fighter>();
    assert_eq!(fighters.iter(app.world()).count(), 2);
    assert_eq!(app.world().resource::<SimClock>().tick, 0);
    assert!(app.world().resource::<GameLoop>().is_running());
}

/// Leave `entity` reeling from the third hit of a combo.
fn take_combo_hit(app: &mut App, entity: Entity, attacker: Entity) {
    let world = app.world_mut();
    world.get_mut::<CombatState>(entity).expect("combat").enter_hurt(500.0);
    world.get_mut::<ComboBreaker>(entity).expect("breaker").open_window();
    world.get_mut::<Combo>(attacker).expect("combo").count = 3;
}

fn press(app: &mut App, intent: Intent, timestamp_ms: f64) {
    app.world_mut()
        .send_event(IntentEvent::press(Side::Player, intent, timestamp_ms));
}

#[test]
fn punch_kick_breaks_a_combo_once_per_cooldown() {
    let mut app = battle_app(BattleConfig::default());
    let player = fighter_entity(&mut app, Side::Player);
    let boss = fighter_entity(&mut app, Side::Boss);

    take_combo_hit(&mut app, player, boss);
    press(&mut app, Intent::Punch, 0.0);
    press(&mut app, Intent::Kick, 50.0);
    run_ticks(app.world_mut(), 1);

    assert_eq!(app.world().get::<Combo>(boss).unwrap().count, 0);
    let combat = app.world().get::<CombatState>(player).unwrap();
    assert_ne!(combat.state, FighterState::Hurt);
    assert_eq!(combat.hitstun_ms, 0.0);
    let broken: Vec<&ComboBroken> = app
        .world()
        .resource::<Events<ComboBroken>>()
        .iter_current_update_events()
        .collect();
    assert_eq!(broken.len(), 1);
    assert_eq!(broken[0].fighter, player);
    assert_eq!(broken[0].attacker, boss);
    assert_eq!(broken[0].hits, 3);

    // a second break inside the cooldown does nothing
    take_combo_hit(&mut app, player, boss);
    press(&mut app, Intent::Punch, 100.0);
    press(&mut app, Intent::Kick, 150.0);
    run_ticks(app.world_mut(), 1);

    assert_eq!(app.world().get::<Combo>(boss).unwrap().count, 3);
    assert_eq!(
        app.world().get::<CombatState>(player).unwrap().state,
        FighterState::Hurt
    );
}

#[test]
fn combo_breaker_needs_an_open_window() {
    let mut app = battle_app(BattleConfig::default());
    let player = fighter_entity(&mut app, Side::Player);
    let boss = fighter_entity(&mut app, Side::Boss);

    take_combo_hit(&mut app, player, boss);
    app.world_mut()
        .get_mut::<ComboBreaker>(player)
        .unwrap()
        .window_frames = 0;
    press(&mut app, Intent::Punch, 0.0);
    press(&mut app, Intent::Kick, 50.0);
    run_ticks(app.world_mut(), 1);

    assert_eq!(app.world().get::<Combo>(boss).unwrap().count, 3);
}

#[test]
fn soft_knockdowns_allow_a_quick_rise() {
    let mut app = battle_app(BattleConfig::default());
    let player = fighter_entity(&mut app, Side::Player);

    app.world_mut()
        .get_mut::<CombatState>(player)
        .unwrap()
        .enter_knockdown(Knockdown {
            hard: false,
            frames: 24,
        });
    press(&mut app, Intent::Jump, 0.0);
    run_ticks(app.world_mut(), 1);

    let combat = app.world().get::<CombatState>(player).unwrap();
    assert_eq!(combat.state, FighterState::Idle);
    // rising does not also jump
    assert!(body(&app, player).grounded);
}

#[test]
fn hard_knockdowns_ignore_the_quick_rise() {
    let mut app = battle_app(BattleConfig::default());
    let player = fighter_entity(&mut app, Side::Player);

    app.world_mut()
        .get_mut::<CombatState>(player)
        .unwrap()
        .enter_knockdown(Knockdown {
            hard: true,
            frames: 30,
        });
    press(&mut app, Intent::Jump, 0.0);
    run_ticks(app.world_mut(), 1);

    let combat = app.world().get::<CombatState>(player).unwrap();
    assert_eq!(combat.state, FighterState::KnockedDown);
    assert_eq!(combat.knockdown_frames, 29);
}

#[test]
fn crouching_kick_is_a_sweep() {
    let mut app = battle_app(BattleConfig::default());
    let player = fighter_entity(&mut app, Side::Player);

    press(&mut app, Intent::Crouch, 0.0);
    run_ticks(app.world_mut(), 1);
    assert!(body(&app, player).crouching);

    press(&mut app, Intent::Kick, 20.0);
    run_ticks(app.world_mut(), 1);
    let combat = app.world().get::<CombatState>(player).unwrap();
    assert_eq!(combat.current_attack.as_deref(), Some("sweep"));
}
