//! Effect systems - spawn from combat events, then age pooled records.

use std::f32::consts::TAU;

use bevy::prelude::*;

use super::components::*;
use crate::animation::{AnimationCatalog, SpriteAnimation, Visual};
use crate::collision::ClashEvent;
use crate::combat::{CombatState, SpecialMeter};
use crate::config::MoveTier;
use crate::core::{HitLanded, SimClock};
use crate::entities::{Body, Effect, EffectKind, Fighter};
use crate::perf::PerformanceMonitor;
use crate::pool::ObjectPools;

const SPARK_LIFETIME: f32 = 0.3;
const PARTICLE_GRAVITY: f32 = 600.0;

/// Acquire an effect unless the tier's effect budget is spent.
fn try_spawn_effect(
    pools: &mut ObjectPools,
    max_effects: usize,
    now: f64,
    init: impl FnOnce(&mut Effect),
) -> bool {
    if pools.effects.active_count() >= max_effects {
        return false;
    }
    pools.effects.acquire_with(now, init);
    true
}

/// Spark, particle burst and damage number for every resolved hit.
pub fn spawn_hit_effects(
    clock: Res<SimClock>,
    monitor: Res<PerformanceMonitor>,
    mut pools: ResMut<ObjectPools>,
    mut hits: EventReader<HitLanded>,
    attackers: Query<&CombatState>,
) {
    let now = clock.now_ms();
    let preset = monitor.preset();

    for hit in hits.read() {
        let special = attackers
            .get(hit.attacker)
            .is_ok_and(|combat| combat.current_tier == MoveTier::Special);
        let (kind, color) = if hit.blocked {
            (EffectKind::BlockSpark, BLOCK_SPARK)
        } else if hit.damage > HEAVY_HIT_DAMAGE || special {
            (EffectKind::HeavyHit, HEAVY_SPARK)
        } else {
            (EffectKind::Hit, HIT_SPARK)
        };

        try_spawn_effect(&mut pools, preset.max_effects, now, |effect| {
            effect.spawn(kind, hit.position, SPARK_LIFETIME, color);
        });

        let burst = match kind {
            EffectKind::HeavyHit => 12,
            EffectKind::BlockSpark => 4,
            _ => 8,
        };
        let room = preset
            .particle_limit
            .saturating_sub(pools.particles.active_count());
        let count = burst.min(room);
        for i in 0..count {
            let angle = i as f32 / count as f32 * TAU;
            let speed = if i % 2 == 0 { 250.0 } else { 150.0 };
            pools.particles.acquire_with(now, |particle| {
                particle.position = hit.position;
                particle.velocity = Vec2::from_angle(angle) * speed;
                particle.gravity = PARTICLE_GRAVITY;
                particle.lifetime_secs = 0.5;
                particle.max_lifetime_secs = 0.5;
                particle.size = if kind == EffectKind::HeavyHit { 4.0 } else { 3.0 };
                particle.color = color;
            });
        }

        if preset.damage_numbers && hit.damage > 0.0 {
            pools.texts.acquire_with(now, |text| {
                text.text.push_str(&format!("{}", hit.damage.round() as i64));
                text.position = hit.position + Vec2::new(0.0, -20.0);
                text.velocity = Vec2::new(0.0, -60.0);
                text.lifetime_secs = 1.0;
                text.max_lifetime_secs = 1.0;
                text.critical = hit.critical;
                text.scale = if hit.critical { 1.5 } else { 1.0 };
                text.color = if hit.critical { CRIT_TEXT } else { DAMAGE_TEXT };
            });
        }
    }
}

pub fn spawn_clash_effects(
    clock: Res<SimClock>,
    monitor: Res<PerformanceMonitor>,
    mut pools: ResMut<ObjectPools>,
    mut clashes: EventReader<ClashEvent>,
) {
    let now = clock.now_ms();
    let max_effects = monitor.preset().max_effects;
    for clash in clashes.read() {
        try_spawn_effect(&mut pools, max_effects, now, |effect| {
            effect.spawn(EffectKind::Clash, clash.position, 0.25, CLASH_FLASH);
            effect.scale = 1.5;
        });
    }
}

/// Dust clouds behind fighters running fast on the ground.
pub fn spawn_dust(
    clock: Res<SimClock>,
    monitor: Res<PerformanceMonitor>,
    mut pools: ResMut<ObjectPools>,
    mut fighters: Query<(&Body, &mut EffectCooldowns)>,
) {
    let now = clock.now_ms();
    let max_effects = monitor.preset().max_effects;
    for (body, mut cooldowns) in fighters.iter_mut() {
        if !body.grounded || body.velocity.x.abs() <= DUST_SPEED {
            continue;
        }
        if now - cooldowns.last_dust_ms < DUST_COOLDOWN_MS {
            continue;
        }
        if try_spawn_effect(&mut pools, max_effects, now, |effect| {
            effect.spawn(EffectKind::Dust, body.position, 0.4, DUST_BROWN);
        }) {
            cooldowns.last_dust_ms = now;
        }
    }
}

/// Keep an aura on every fighter whose meter is full.
pub fn update_auras(
    clock: Res<SimClock>,
    mut pools: ResMut<ObjectPools>,
    fighters: Query<(Entity, &SpecialMeter, &Body)>,
) {
    let now = clock.now_ms();
    for (entity, meter, body) in fighters.iter() {
        if !meter.is_full() {
            continue;
        }
        let offset = Vec2::new(0.0, -body.height * 0.5);
        let existing = pools
            .effects
            .iter()
            .find(|(_, effect)| effect.kind == EffectKind::Aura && effect.follow == Some(entity))
            .map(|(id, _)| id);
        match existing {
            Some(id) => {
                if let Some(aura) = pools.effects.get_mut(id) {
                    aura.lifetime_secs = aura.max_lifetime_secs;
                }
                pools.effects.touch(id, now);
            }
            None => {
                pools.effects.acquire_with(now, |aura| {
                    aura.spawn(EffectKind::Aura, body.position + offset, 0.5, AURA_BLUE);
                    aura.follow = Some(entity);
                    aura.follow_offset = offset;
                });
            }
        }
    }
}

/// Leave fading copies of dashing fighters behind.
pub fn spawn_afterimages(
    clock: Res<SimClock>,
    catalog: Res<AnimationCatalog>,
    mut pools: ResMut<ObjectPools>,
    mut fighters: Query<(
        Entity,
        &Fighter,
        &Body,
        &SpriteAnimation,
        &Visual,
        &mut EffectCooldowns,
    )>,
) {
    let now = clock.now_ms();
    for (entity, fighter, body, animation, visual, mut cooldowns) in fighters.iter_mut() {
        if !body.is_dashing() || now - cooldowns.last_afterimage_ms < AFTERIMAGE_INTERVAL_MS {
            continue;
        }
        cooldowns.last_afterimage_ms = now;
        let drawable = catalog.drawable(&fighter.archetype, animation.current, animation.frame);
        pools.sprites.acquire_with(now, |sprite| {
            sprite.owner = entity;
            sprite.drawable = drawable;
            sprite.position = body.position;
            sprite.flip_x = visual.flip_x;
            sprite.alpha = 0.5;
            sprite.tint = visual.tint;
            sprite.lifetime_secs = 0.2;
            sprite.max_lifetime_secs = 0.2;
        });
    }
}

/// Move and fade particles, texts and afterimages; release the expired ones.
pub fn update_transients(clock: Res<SimClock>, mut pools: ResMut<ObjectPools>) {
    let dt = clock.dt();

    for (_, particle) in pools.particles.iter_mut() {
        particle.velocity.y += particle.gravity * dt;
        particle.position += particle.velocity * dt;
        particle.lifetime_secs -= dt;
        particle.alpha = fraction(particle.lifetime_secs, particle.max_lifetime_secs);
    }
    pools
        .particles
        .release_where(|particle| particle.lifetime_secs <= 0.0);

    for (_, text) in pools.texts.iter_mut() {
        text.position += text.velocity * dt;
        text.lifetime_secs -= dt;
        text.alpha = fraction(text.lifetime_secs, text.max_lifetime_secs);
    }
    pools.texts.release_where(|text| text.lifetime_secs <= 0.0);

    for (_, sprite) in pools.sprites.iter_mut() {
        sprite.lifetime_secs -= dt;
        sprite.alpha = 0.5 * fraction(sprite.lifetime_secs, sprite.max_lifetime_secs);
    }
    pools.sprites.release_where(|sprite| sprite.lifetime_secs <= 0.0);
}

fn fraction(lifetime: f32, max_lifetime: f32) -> f32 {
    if max_lifetime <= 0.0 {
        return 0.0;
    }
    (lifetime / max_lifetime).clamp(0.0, 1.0)
}
