//! Per-tick hit/hurt box rebuild and overlap detection.

use std::collections::HashSet;

use bevy::prelude::*;

use super::boxes::*;
use crate::combat::{CombatState, FighterState};
use crate::config::{HitboxKind, Knockdown, MoveLibrary, MoveTier};
use crate::core::SimClock;
use crate::entities::{Body, FighterStats};
use crate::pool::{ObjectPools, PoolId};

/// Flat hit/hurt geometry of the current tick.
#[derive(Resource, Debug, Default)]
pub struct CollisionWorld {
    /// Strike hitboxes acquired from the hitbox pool this tick
    pub strike_hitboxes: Vec<PoolId>,
    pub hurtboxes: Vec<Hurtbox>,
    resolved: HashSet<(Entity, HitSource, Entity)>,
}

impl CollisionWorld {
    /// Return this tick's strike hitboxes to the pool and forget all geometry.
    pub fn clear(&mut self, pools: &mut ObjectPools) {
        for id in self.strike_hitboxes.drain(..) {
            pools.hitboxes.release(id);
        }
        self.hurtboxes.clear();
        self.resolved.clear();
    }
}

/// A hitbox overlapped a hurtbox of another fighter.
#[derive(Event, Debug, Clone)]
pub struct HitEvent {
    pub attacker: Entity,
    pub defender: Entity,
    pub source: HitSource,
    pub kind: HitboxKind,
    pub priority: u8,
    pub tier: MoveTier,
    pub hurtbox: HurtboxKind,
    /// Hitbox damage scaled by the hurtbox multiplier
    pub damage: f32,
    pub hitstun_ms: f32,
    pub blockstun_ms: f32,
    pub knockback: Vec2,
    pub hitstop_frames: u32,
    pub knockdown: Option<Knockdown>,
    /// Centre of the hitbox
    pub origin: Vec2,
}

/// Two strikes of similar priority met and cancelled out. The push and
/// invincibility are applied by the combat phase.
#[derive(Event, Debug, Clone)]
pub struct ClashEvent {
    pub first: Entity,
    pub second: Entity,
    pub position: Vec2,
}

/// Rebuild hurtboxes from posture and strike hitboxes from move data.
pub fn rebuild_boxes(
    clock: Res<SimClock>,
    library: Res<MoveLibrary>,
    mut pools: ResMut<ObjectPools>,
    mut world: ResMut<CollisionWorld>,
    fighters: Query<(Entity, &Body, &CombatState, &FighterStats)>,
) {
    let now = clock.now_ms();
    world.clear(&mut pools);

    for (entity, body, combat, stats) in fighters.iter() {
        if !body.is_finite() {
            debug!("Skipping boxes for {:?}: non-finite body", entity);
            continue;
        }

        let shapes = &library.hurtboxes;
        let shape = if body.is_dashing() {
            &shapes.dashing
        } else if !body.grounded {
            &shapes.airborne
        } else if body.crouching {
            &shapes.crouching
        } else {
            &shapes.standing
        };
        let kind = if combat.invincible || combat.state == FighterState::KnockedDown {
            HurtboxKind::Invulnerable
        } else if combat.state == FighterState::Counter {
            HurtboxKind::Counter
        } else if stats.armored {
            HurtboxKind::Armor
        } else {
            HurtboxKind::Normal
        };
        world
            .hurtboxes
            .push(Hurtbox::from_shape(entity, kind, shape, body.position));

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

        for template in &data.hitboxes {
            if template.active_range(combat.attack_frame).is_none() {
                continue;
            }
            let id = pools.hitboxes.acquire_with(now, |hitbox| {
                hitbox.load_template(entity, template, data.tier);
                hitbox.hitstop_frames = data.hit_strength(template.damage).hitstop_frames();
                hitbox.knockdown = data.knockdown;
                hitbox.update_frame(combat.attack_frame);
                hitbox.place(body.position, body.facing);
            });
            world.strike_hitboxes.push(id);
        }
    }
}

struct Candidate {
    hitbox: Hitbox,
    suppressed: bool,
}

/// Clash pass, then every live hitbox against every foreign hurtbox.
pub fn detect_hits(
    mut world: ResMut<CollisionWorld>,
    pools: Res<ObjectPools>,
    fighters: Query<&CombatState>,
    mut hits: EventWriter<HitEvent>,
    mut clashes: EventWriter<ClashEvent>,
) {
    let mut candidates: Vec<Candidate> = world
        .strike_hitboxes
        .iter()
        .filter_map(|id| pools.hitboxes.get(*id))
        .chain(pools.projectiles.iter().map(|(_, projectile)| &projectile.hitbox))
        .filter(|hitbox| hitbox.active && hitbox.bounds.is_finite())
        .map(|hitbox| Candidate {
            hitbox: hitbox.clone(),
            suppressed: false,
        })
        .collect();

    resolve_clashes(&mut candidates, &mut clashes);

    let world = &mut *world;
    for candidate in candidates.iter().filter(|c| !c.suppressed) {
        let hitbox = &candidate.hitbox;
        for hurtbox in &world.hurtboxes {
            if hurtbox.owner == hitbox.owner || hurtbox.kind == HurtboxKind::Invulnerable {
                continue;
            }
            let key = (hitbox.owner, hitbox.source, hurtbox.owner);
            if world.resolved.contains(&key) {
                continue;
            }
            if let HitSource::Strike { range } = hitbox.source {
                let already = fighters
                    .get(hitbox.owner)
                    .is_ok_and(|combat| combat.has_connected(range));
                if already {
                    continue;
                }
            }
            if !hitbox.bounds.intersects(&hurtbox.bounds) {
                continue;
            }

            world.resolved.insert(key);
            hits.send(HitEvent {
                attacker: hitbox.owner,
                defender: hurtbox.owner,
                source: hitbox.source,
                kind: hitbox.kind,
                priority: hitbox.priority,
                tier: hitbox.tier,
                hurtbox: hurtbox.kind,
                damage: hitbox.damage * hurtbox.damage_multiplier,
                hitstun_ms: hitbox.hitstun_ms,
                blockstun_ms: hitbox.blockstun_ms,
                knockback: hitbox.knockback,
                hitstop_frames: hitbox.hitstop_frames,
                knockdown: hitbox.knockdown,
                origin: hitbox.bounds.center(),
            });
        }
    }
}

fn resolve_clashes(candidates: &mut [Candidate], clashes: &mut EventWriter<ClashEvent>) {
    let mut clashed_pairs: HashSet<(Entity, Entity)> = HashSet::new();

    for i in 0..candidates.len() {
        for j in (i + 1)..candidates.len() {
            let (a, b) = (&candidates[i].hitbox, &candidates[j].hitbox);
            if a.kind != HitboxKind::Strike
                || b.kind != HitboxKind::Strike
                || a.owner == b.owner
                || !a.bounds.intersects(&b.bounds)
            {
                continue;
            }

            let (first, second) = (a.owner, b.owner);
            let priority_gap = a.priority.abs_diff(b.priority);
            if priority_gap <= 1 {
                let position = (a.bounds.center() + b.bounds.center()) * 0.5;
                candidates[i].suppressed = true;
                candidates[j].suppressed = true;

                let pair = if first < second { (first, second) } else { (second, first) };
                if !clashed_pairs.insert(pair) {
                    continue;
                }
                clashes.send(ClashEvent {
                    first,
                    second,
                    position,
                });
            } else if a.priority < b.priority {
                candidates[i].suppressed = true;
            } else {
                candidates[j].suppressed = true;
            }
        }
    }
}
