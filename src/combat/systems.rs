//! Combat systems - state machine, hit resolution and battle end.

use bevy::ecs::query::QueryData;
use bevy::prelude::*;

use super::components::*;
use super::damage::*;
use crate::collision::{ClashEvent, HitEvent, HitSource, HurtboxKind};
use crate::config::{HitboxKind, MoveLibrary, MoveTier};
use crate::core::{
    BattleEnded, BattleOutcome, BattleReport, BattleState, BattleStats, CombatRng, Countered,
    HitLanded, SimClock,
};
use crate::entities::{Body, Facing, Fighter, FighterStats, Health, Side};
use crate::game_loop::GameLoop;
use crate::pool::ObjectPools;

/// Passive meter regeneration per tick.
pub const METER_REGEN_PER_TICK: f32 = 0.1;

/// Horizontal speed at which clashing fighters are pushed apart.
pub const CLASH_PUSH: f32 = 150.0;

/// Invincibility ticks granted to both sides of a clash.
pub const CLASH_INVINCIBILITY: u32 = 8;

/// Advance move frames, stun timers and invincibility.
/// Fighters in hitstop skip the tick entirely.
pub fn tick_combat_states(
    clock: Res<SimClock>,
    library: Res<MoveLibrary>,
    mut fighters: Query<(
        Entity,
        &mut CombatState,
        &mut SpecialMeter,
        &mut Health,
        &mut Body,
    )>,
) {
    let step_ms = clock.timestep_ms as f32;

    for (entity, mut combat, mut meter, mut health, mut body) in fighters.iter_mut() {
        health.clamp();
        if combat.state.is_final() {
            continue;
        }
        if combat.hitstop_frames > 0 {
            combat.hitstop_frames -= 1;
            continue;
        }
        meter.add(METER_REGEN_PER_TICK);

        match combat.state {
            FighterState::Attacking | FighterState::Special | FighterState::Counter => {
                combat.attack_frame += 1;
                if combat.attack_frame >= combat.attack_duration {
                    if combat.recovery_frames > 0 {
                        combat.state = FighterState::Recovery;
                    } else {
                        combat.cancel_attack();
                        combat.state = FighterState::Idle;
                    }
                }
            }
            FighterState::Recovery => {
                combat.recovery_frames = combat.recovery_frames.saturating_sub(1);
                if combat.recovery_frames == 0 {
                    combat.cancel_attack();
                    combat.state = FighterState::Idle;
                }
            }
            FighterState::Hurt => {
                combat.hitstun_ms -= step_ms;
                if combat.hitstun_ms <= 0.0 {
                    combat.hitstun_ms = 0.0;
                    combat.state = if body.grounded {
                        FighterState::Idle
                    } else {
                        FighterState::Jumping
                    };
                }
            }
            FighterState::KnockedDown => {
                combat.knockdown_frames = combat.knockdown_frames.saturating_sub(1);
                if combat.knockdown_frames == 0 {
                    combat.state = if body.grounded {
                        FighterState::Idle
                    } else {
                        FighterState::Jumping
                    };
                    body.jumps_remaining = body.max_jumps;
                    debug!("{:?} woke up", entity);
                }
            }
            FighterState::Blocking => {
                combat.blockstun_ms = (combat.blockstun_ms - step_ms).max(0.0);
            }
            _ => {}
        }

        if combat.invincibility_frames > 0 {
            combat.invincibility_frames -= 1;
        }
        let move_invulnerable = combat.state.is_attacking()
            && combat
                .current_attack
                .as_deref()
                .and_then(|name| library.get(name))
                .is_some_and(|data| data.is_invulnerable_at(combat.attack_frame));
        combat.invincible = combat.invincibility_frames > 0 || move_invulnerable;
    }
}

pub fn tick_breakers(mut breakers: Query<&mut ComboBreaker>) {
    for mut breaker in breakers.iter_mut() {
        breaker.window_frames = breaker.window_frames.saturating_sub(1);
    }
}

/// Push clashing fighters apart and make both briefly invincible.
/// Runs after `tick_combat_states` so the full invincibility reaches the next tick.
pub fn apply_clashes(
    mut clashes: EventReader<ClashEvent>,
    mut fighters: Query<(&mut Body, &mut CombatState)>,
) {
    for clash in clashes.read() {
        let Ok([(mut body_a, mut combat_a), (mut body_b, mut combat_b)]) =
            fighters.get_many_mut([clash.first, clash.second])
        else {
            continue;
        };
        let direction = if body_a.position.x <= body_b.position.x { -1.0 } else { 1.0 };
        body_a.velocity.x = CLASH_PUSH * direction;
        body_b.velocity.x = -CLASH_PUSH * direction;
        combat_a.grant_invincibility(CLASH_INVINCIBILITY);
        combat_b.grant_invincibility(CLASH_INVINCIBILITY);
    }
}

/// Spawn projectiles for moves that reach their release frame.
pub fn launch_projectiles(
    clock: Res<SimClock>,
    library: Res<MoveLibrary>,
    mut pools: ResMut<ObjectPools>,
    fighters: Query<(Entity, &CombatState, &Body)>,
) {
    let now = clock.now_ms();
    for (entity, combat, body) in fighters.iter() {
        if !combat.state.is_attacking() {
            continue;
        }
        let Some(data) = combat
            .current_attack
            .as_deref()
            .and_then(|name| library.get(name))
        else {
            continue;
        };
        let Some(spec) = &data.projectile else {
            continue;
        };
        if combat.attack_frame != spec.spawn_frame {
            continue;
        }

        let sign = body.facing.sign();
        let position = body.position + Vec2::new(spec.offset.0 * sign, spec.offset.1);
        let id = pools.projectiles.acquire(now);
        if let Some(projectile) = pools.projectiles.get_mut(id) {
            projectile.owner = entity;
            projectile.position = position;
            projectile.velocity = Vec2::new(spec.speed * sign, 0.0);
            projectile.lifetime_secs = spec.lifetime_secs;
            projectile.max_lifetime_secs = spec.lifetime_secs;

            let hitbox = &mut projectile.hitbox;
            hitbox.owner = entity;
            hitbox.source = HitSource::Projectile(id);
            hitbox.kind = HitboxKind::Projectile;
            hitbox.priority = spec.priority;
            hitbox.tier = data.tier;
            hitbox.size = Vec2::from(spec.size);
            hitbox.damage = spec.damage;
            hitbox.hitstun_ms = spec.hitstun_ms;
            hitbox.blockstun_ms = spec.blockstun_ms;
            hitbox.knockback = Vec2::from(spec.knockback);
            hitbox.hitstop_frames = data.hit_strength(spec.damage).hitstop_frames();
            hitbox.knockdown = None;
            hitbox.update_frame(0);
            hitbox.place(position, body.facing);
        }
        debug!("{:?} launched projectile {:?}", entity, id);
    }
}

#[derive(QueryData)]
#[query_data(mutable)]
pub struct Combatant {
    pub body: &'static mut Body,
    pub combat: &'static mut CombatState,
    pub health: &'static mut Health,
    pub combo: &'static mut Combo,
    pub meter: &'static mut SpecialMeter,
    pub ledger: &'static mut DamageLedger,
    pub breaker: &'static mut ComboBreaker,
    pub stats: &'static FighterStats,
}

/// Apply every hit detected this tick.
///
/// Landed and blocked hits freeze both fighters for the hit's hitstop; a
/// projectile only freezes the fighter it hits.
pub fn resolve_hits(
    clock: Res<SimClock>,
    mut hits: EventReader<HitEvent>,
    mut rng: ResMut<CombatRng>,
    mut pools: ResMut<ObjectPools>,
    mut fighters: Query<Combatant>,
    mut landed: EventWriter<HitLanded>,
    mut countered: EventWriter<Countered>,
) {
    let now = clock.now_ms();

    for hit in hits.read() {
        let Ok([mut attacker, mut defender]) = fighters.get_many_mut([hit.attacker, hit.defender])
        else {
            continue;
        };
        if defender.health.is_dead() || defender.combat.state.is_final() {
            continue;
        }

        let from_projectile = match hit.source {
            HitSource::Projectile(id) => {
                pools.projectiles.release(id);
                true
            }
            HitSource::Strike { range } => {
                attacker.combat.mark_connected(range);
                false
            }
        };
        let scale = if from_projectile { 0.5 } else { 1.0 };
        // Projectiles are blocked and push back from where they are, not from the thrower
        let threat_x = if from_projectile {
            hit.origin.x
        } else {
            attacker.body.position.x
        };
        let direction = away_direction(threat_x, defender.body.position.x, attacker.body.facing);

        if hit.hurtbox == HurtboxKind::Counter && hit.kind == HitboxKind::Strike {
            attacker.combat.enter_hurt(hit.hitstun_ms);
            countered.send(Countered {
                defender: hit.defender,
                attacker: hit.attacker,
            });
            continue;
        }

        let facing_threat =
            defender.body.facing == Facing::towards(defender.body.position.x, threat_x);
        let blocked = defender.combat.state == FighterState::Blocking
            && facing_threat
            && hit.kind != HitboxKind::Throw;

        defender.combat.freeze(hit.hitstop_frames);
        if !from_projectile {
            attacker.combat.freeze(hit.hitstop_frames);
        }

        if blocked {
            defender.combat.enter_blockstun(hit.blockstun_ms * scale);
            defender.body.velocity = block_knockback(hit.knockback, direction, scale);
            let chip = if hit.tier == MoveTier::Special {
                chip_damage(hit.damage)
            } else {
                0.0
            };
            let taken = defender.health.take_damage(chip);
            attacker.ledger.dealt += taken;
            defender.ledger.taken += taken;
            landed.send(HitLanded {
                attacker: hit.attacker,
                defender: hit.defender,
                damage: taken,
                critical: false,
                blocked: true,
                position: hit.origin,
            });
            continue;
        }

        let strength = if from_projectile {
            NEUTRAL_STRENGTH
        } else {
            attacker.stats.strength
        };
        let critical = rng.chance(attacker.stats.crit_chance);
        attacker.combo.expire(now);
        let combo_before = attacker.combo.count;
        let damage = compute_damage(
            hit.damage,
            strength,
            defender.stats.defense,
            combo_before,
            critical,
        );
        let taken = defender.health.take_damage(damage);

        if hit.hurtbox != HurtboxKind::Armor {
            match hit.knockdown {
                Some(knockdown) => defender.combat.enter_knockdown(knockdown),
                None => defender.combat.enter_hurt(hit.hitstun_ms * scale),
            }
            defender.body.velocity = hit_knockback(hit.knockback, direction, scale);
            defender.body.grounded = false;
            defender.breaker.open_window();
        }

        attacker.combo.register_hit(now);
        attacker.meter.add(meter_gain(damage));
        attacker.ledger.dealt += taken;
        defender.ledger.taken += taken;

        landed.send(HitLanded {
            attacker: hit.attacker,
            defender: hit.defender,
            damage: taken,
            critical,
            blocked: false,
            position: hit.origin,
        });
    }
}

pub fn expire_combos(clock: Res<SimClock>, mut combos: Query<&mut Combo>) {
    let now = clock.now_ms();
    for mut combo in combos.iter_mut() {
        combo.expire(now);
    }
}

/// End the battle on a knockout or when the round timer runs out.
#[allow(clippy::too_many_arguments)]
pub fn check_battle_end(
    clock: Res<SimClock>,
    mut timer: ResMut<RoundTimer>,
    mut report: ResMut<BattleReport>,
    mut game_loop: ResMut<GameLoop>,
    mut next_state: ResMut<NextState<BattleState>>,
    mut ended: EventWriter<BattleEnded>,
    mut fighters: Query<(&Fighter, &Health, &mut CombatState, &Combo, &DamageLedger)>,
) {
    timer.tick(clock.timestep_ms);

    if fighters.iter().any(|(_, _, combat, _, _)| combat.state.is_final()) {
        return;
    }

    let mut player = None;
    let mut boss = None;
    for (fighter, health, _, combo, ledger) in fighters.iter() {
        let summary = (health.current, health.percentage(), combo.max, ledger.clone());
        match fighter.side {
            Side::Player => player = Some(summary),
            Side::Boss => boss = Some(summary),
        }
    }
    let (Some(player), Some(boss)) = (player, boss) else {
        return;
    };

    let (player_health, player_fraction, player_max_combo, player_ledger) = player;
    let (boss_health, boss_fraction, _, _) = boss;
    let knockout = player_health <= 0.0 || boss_health <= 0.0;
    if !knockout && !timer.expired() {
        return;
    }

    let victory = if knockout {
        boss_health <= 0.0 && player_health > 0.0
    } else {
        player_fraction > boss_fraction
    };

    for (fighter, _, mut combat, _, _) in fighters.iter_mut() {
        let won = (fighter.side == Side::Player) == victory;
        combat.cancel_attack();
        combat.hitstun_ms = 0.0;
        combat.blockstun_ms = 0.0;
        combat.state = if won {
            FighterState::Victory
        } else {
            FighterState::Defeat
        };
    }

    let outcome = BattleOutcome {
        victory,
        score: battle_score(
            player_health,
            player_max_combo,
            player_ledger.dealt,
            clock.elapsed_ms,
        ),
        stats: BattleStats {
            damage_dealt: player_ledger.dealt,
            damage_taken: player_ledger.taken,
            max_combo: player_max_combo,
            time_elapsed_ms: clock.elapsed_ms,
        },
    };

    info!(
        "Battle over after {} ticks ({}): {} with score {}",
        clock.tick,
        if knockout { "knockout" } else { "time" },
        if victory { "victory" } else { "defeat" },
        outcome.score
    );

    report.outcome = Some(outcome.clone());
    ended.send(BattleEnded { outcome });
    game_loop.stop();
    next_state.set(BattleState::Ended);
}
