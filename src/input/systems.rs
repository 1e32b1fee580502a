//! Intent processing and held-control movement.

use bevy::prelude::*;

use super::combos::*;
use super::components::*;
use crate::combat::{CombatState, Combo, ComboBreaker, FighterState, SpecialMeter};
use crate::config::MoveLibrary;
use crate::core::{ComboBroken, SimClock};
use crate::entities::{Body, Facing, Fighter, FighterStats, Side};

pub const JUMP_VELOCITY: f32 = -500.0;
pub const SHORYUKEN_RISE: f32 = -600.0;
pub const DASH_SPEED: f32 = 500.0;
pub const DASH_FRAMES: u32 = 10;

/// Start `requested` if the fighter is free to act, or as a cancel out of an
/// early normal when `allow_cancel` is set. Metered moves spend their cost.
pub fn try_start_move(
    requested: &str,
    library: &MoveLibrary,
    combat: &mut CombatState,
    meter: &mut SpecialMeter,
    allow_cancel: bool,
) -> bool {
    let name = library.resolve_name(requested);
    let Some(data) = library.get(name) else {
        return false;
    };
    if !(combat.state.can_act() || (allow_cancel && combat.can_cancel())) {
        return false;
    }
    if data.meter_cost > 0.0 && !meter.spend(data.meter_cost) {
        debug!("Not enough meter for {}", name);
        return false;
    }
    combat.start_move(name, data);
    true
}

/// Apply this tick's intent events to the matching fighters.
/// Punch then kick while reeling from a hit spends the combo breaker.
pub fn apply_intents(
    clock: Res<SimClock>,
    library: Res<MoveLibrary>,
    mut intents: EventReader<IntentEvent>,
    mut fighters: Query<(
        Entity,
        &Fighter,
        &mut Body,
        &mut CombatState,
        &mut SpecialMeter,
        &mut ControlState,
        &mut InputHistory,
        &mut ComboBreaker,
    )>,
    mut combos: Query<(Entity, &Fighter, &mut Combo)>,
    mut patterns: EventWriter<PatternDetected>,
    mut broken: EventWriter<ComboBroken>,
) {
    let now = clock.now_ms();
    for event in intents.read() {
        let Some((
            entity,
            fighter,
            mut body,
            mut combat,
            mut meter,
            mut controls,
            mut history,
            mut breaker,
        )) = fighters
            .iter_mut()
            .find(|(_, fighter, ..)| fighter.side == event.fighter)
        else {
            continue;
        };
        if combat.state.is_final() {
            continue;
        }

        if event.intent.is_held() {
            controls.set(event.intent, event.pressed);
            let crouch_released = event.intent == Intent::Crouch && !event.pressed;
            if !event.pressed && !crouch_released {
                continue;
            }
            let Some(notation) = Notation::from_controls(&controls, body.facing) else {
                continue;
            };
            if event.intent == Intent::Block {
                continue;
            }
            if let Some(pattern) = history.push(notation, event.timestamp_ms) {
                patterns.send(PatternDetected {
                    fighter: entity,
                    side: fighter.side,
                    pattern,
                });
                perform_pattern(pattern, &library, &mut body, &mut combat, &mut meter);
            }
            continue;
        }

        if !event.pressed {
            continue;
        }

        let notation = match event.intent {
            Intent::Punch => Some(Notation::Punch),
            Intent::Kick => Some(Notation::Kick),
            _ => None,
        };
        if let Some(pattern) = notation.and_then(|n| history.push(n, event.timestamp_ms)) {
            patterns.send(PatternDetected {
                fighter: entity,
                side: fighter.side,
                pattern,
            });
            let breaking = pattern == ComboPattern::PunchKick
                && combat.state == FighterState::Hurt
                && breaker.try_break(now);
            if breaking {
                let opponent = fighter.side.opponent();
                if let Some((attacker, _, mut combo)) = combos
                    .iter_mut()
                    .find(|(_, owner, _)| owner.side == opponent)
                {
                    info!("{:?} broke a {}-hit combo", entity, combo.count);
                    broken.send(ComboBroken {
                        fighter: entity,
                        attacker,
                        hits: combo.count,
                    });
                    combo.count = 0;
                }
                combat.hitstun_ms = 0.0;
                combat.hitstop_frames = 0;
                combat.state = if body.grounded {
                    FighterState::Idle
                } else {
                    FighterState::Jumping
                };
                continue;
            }
            if perform_pattern(pattern, &library, &mut body, &mut combat, &mut meter) {
                continue;
            }
        }

        match event.intent {
            Intent::Jump => {
                if !combat.quick_rise() {
                    jump(&mut body, &mut combat);
                }
            }
            Intent::Punch => {
                try_start_move("punch", &library, &mut combat, &mut meter, false);
            }
            Intent::Kick => {
                let name = if body.crouching { "sweep" } else { "kick" };
                try_start_move(name, &library, &mut combat, &mut meter, false);
            }
            Intent::Uppercut => {
                try_start_move("uppercut", &library, &mut combat, &mut meter, false);
            }
            Intent::Special => {
                try_start_move("special", &library, &mut combat, &mut meter, true);
            }
            Intent::Throw => {
                try_start_move("throw", &library, &mut combat, &mut meter, false);
            }
            Intent::Counter => {
                try_start_move("counter", &library, &mut combat, &mut meter, false);
            }
            _ => {}
        }
    }
}

fn jump(body: &mut Body, combat: &mut CombatState) {
    if !combat.state.can_act() || body.jumps_remaining == 0 {
        return;
    }
    body.velocity.y = JUMP_VELOCITY;
    body.grounded = false;
    body.jumps_remaining -= 1;
    combat.state = FighterState::Jumping;
}

/// Execute a detected pattern. Returns whether it did anything.
fn perform_pattern(
    pattern: ComboPattern,
    library: &MoveLibrary,
    body: &mut Body,
    combat: &mut CombatState,
    meter: &mut SpecialMeter,
) -> bool {
    match pattern {
        ComboPattern::ForwardDash | ComboPattern::BackDash => {
            if !combat.state.can_act() || !body.grounded {
                return false;
            }
            let direction = if pattern == ComboPattern::ForwardDash { 1.0 } else { -1.0 };
            body.velocity.x = DASH_SPEED * direction * body.facing.sign();
            body.dash_frames = DASH_FRAMES;
            true
        }
        _ => {
            let Some(name) = pattern.move_name() else {
                return false;
            };
            let started = try_start_move(name, library, combat, meter, true);
            if started && pattern == ComboPattern::Shoryuken {
                body.velocity.y = SHORYUKEN_RISE;
                body.grounded = false;
            }
            started
        }
    }
}

/// Walking, crouching, blocking and facing from the held controls.
pub fn apply_controls(
    mut fighters: Query<(
        &Fighter,
        &mut Body,
        &mut CombatState,
        &ControlState,
        &FighterStats,
    )>,
) {
    let positions: Vec<(Side, f32)> = fighters
        .iter()
        .map(|(fighter, body, ..)| (fighter.side, body.position.x))
        .collect();

    for (fighter, mut body, mut combat, controls, stats) in fighters.iter_mut() {
        if combat.state.is_final() {
            continue;
        }

        body.crouching = controls.crouch && body.grounded;

        if controls.block && (combat.state.can_act() || combat.state == FighterState::Blocking) {
            if body.grounded {
                combat.state = FighterState::Blocking;
            }
        } else if combat.state == FighterState::Blocking && combat.blockstun_ms <= 0.0 {
            combat.state = FighterState::Idle;
        }

        let free = matches!(combat.state, FighterState::Idle | FighterState::Walking);
        if free && body.grounded && !body.is_dashing() {
            let direction = controls.horizontal();
            if direction != 0.0 && !body.crouching {
                body.velocity.x = direction * stats.speed;
                combat.state = FighterState::Walking;
            } else if combat.state == FighterState::Walking {
                combat.state = FighterState::Idle;
            }
        }

        let may_turn = body.grounded
            && !combat.state.is_attacking()
            && !matches!(combat.state, FighterState::Hurt | FighterState::KnockedDown)
            && !body.is_dashing();
        if may_turn {
            let opponent = fighter.side.opponent();
            if let Some(&(_, x)) = positions.iter().find(|(side, _)| *side == opponent) {
                if (x - body.position.x).abs() > f32::EPSILON {
                    body.facing = Facing::towards(body.position.x, x);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metered_moves_need_meter() {
        let library = MoveLibrary::default();
        let mut combat = CombatState::default();
        let mut meter = SpecialMeter::default();
        assert!(!try_start_move("special", &library, &mut combat, &mut meter, true));
        assert_eq!(combat.state, FighterState::Idle);

        meter.add(100.0);
        assert!(try_start_move("special", &library, &mut combat, &mut meter, true));
        assert_eq!(combat.state, FighterState::Special);
        assert_eq!(meter.value(), 0.0);
    }

    #[test]
    fn specials_cancel_early_normals_only() {
        let library = MoveLibrary::default();
        let mut combat = CombatState::default();
        let mut meter = SpecialMeter::default();
        assert!(try_start_move("punch", &library, &mut combat, &mut meter, false));
        assert!(!try_start_move("kick", &library, &mut combat, &mut meter, false));

        combat.attack_frame = 4;
        assert!(try_start_move("hadouken", &library, &mut combat, &mut meter, true));
        assert_eq!(combat.current_attack.as_deref(), Some("hadouken"));
    }

    #[test]
    fn unknown_moves_fall_back_to_punch() {
        let library = MoveLibrary::default();
        let mut combat = CombatState::default();
        let mut meter = SpecialMeter::default();
        assert!(try_start_move("flying_knee", &library, &mut combat, &mut meter, false));
        assert_eq!(combat.current_attack.as_deref(), Some("punch"));
    }

    #[test]
    fn jumping_spends_a_jump() {
        let mut body = Body::new(Vec2::new(100.0, 300.0), (64.0, 96.0), Facing::Right, 1);
        let mut combat = CombatState::default();
        jump(&mut body, &mut combat);
        assert_eq!(body.velocity.y, JUMP_VELOCITY);
        assert_eq!(body.jumps_remaining, 0);
        assert_eq!(combat.state, FighterState::Jumping);

        body.velocity.y = 0.0;
        jump(&mut body, &mut combat);
        assert_eq!(body.velocity.y, 0.0);
    }
}
