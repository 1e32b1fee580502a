//! Animation systems - clip selection, frame advance, visuals and effect fades.

use bevy::prelude::*;

use super::catalog::AnimationCatalog;
use super::components::*;
use crate::combat::{CombatState, FighterState};
use crate::core::SimClock;
use crate::entities::{Body, EffectKind, Facing};
use crate::pool::ObjectPools;

/// Projectile spin per tick, in radians.
pub const PROJECTILE_SPIN: f32 = 0.2;
pub const PROJECTILE_FRAMES: u32 = 4;
pub const PROJECTILE_TICKS_PER_FRAME: u32 = 4;

/// Upward drift of dust clouds, px/s.
pub const DUST_RISE: f32 = 50.0;

/// Pick each fighter's clip, advance it one tick and send markers.
pub fn animate_fighters(
    catalog: Res<AnimationCatalog>,
    mut fighters: Query<(Entity, &CombatState, &Body, &mut SpriteAnimation)>,
    mut markers: EventWriter<AnimationMarker>,
) {
    for (entity, combat, body, mut animation) in fighters.iter_mut() {
        let clip = Clip::select(combat, body);
        if animation.play(clip) && clip == Clip::Special {
            markers.send(AnimationMarker {
                entity,
                clip,
                kind: MarkerKind::AuraActive,
            });
        }

        let timing = catalog.timing(clip);
        animation.advance(&timing);

        if clip.is_attack() && !animation.impact_sent && animation.frame >= timing.frames / 2 {
            animation.impact_sent = true;
            markers.send(AnimationMarker {
                entity,
                clip,
                kind: MarkerKind::AttackImpact,
            });
        }
    }
}

/// Hit flash, invincibility blink, squash and facing.
pub fn apply_visual_modifiers(mut fighters: Query<(&CombatState, &Body, &mut Visual)>) {
    for (combat, body, mut visual) in fighters.iter_mut() {
        let flashing = combat.hitstun_ms > 0.0 && (combat.hitstun_ms / 50.0).floor() as i64 % 2 == 0;
        let blinking = combat.invincible && combat.invincibility_frames % 4 < 2;

        let (tint, alpha) = if flashing {
            (HIT_RED, 0.7)
        } else if blinking {
            (WHITE, 0.5)
        } else {
            (WHITE, 1.0)
        };
        visual.tint = tint;
        visual.alpha = alpha;

        visual.scale = match combat.state {
            FighterState::Hurt | FighterState::KnockedDown => 0.95,
            FighterState::Special => 1.1,
            _ => 1.0,
        };
        visual.flip_x = body.facing == Facing::Left;
    }
}

/// Spin projectiles and cycle their frames.
pub fn animate_projectiles(mut pools: ResMut<ObjectPools>) {
    for (_, projectile) in pools.projectiles.iter_mut() {
        projectile.rotation += PROJECTILE_SPIN;
        projectile.anim_ticks += 1;
        if projectile.anim_ticks >= PROJECTILE_TICKS_PER_FRAME {
            projectile.anim_ticks = 0;
            projectile.anim_frame = (projectile.anim_frame + 1) % PROJECTILE_FRAMES;
        }
    }
}

/// Age effects, fade them out and release the expired ones.
pub fn update_effects(
    clock: Res<SimClock>,
    mut pools: ResMut<ObjectPools>,
    bodies: Query<&Body>,
) {
    let dt = clock.dt();
    for (_, effect) in pools.effects.iter_mut() {
        effect.lifetime_secs -= dt;
        if let Some(body) = effect.follow.and_then(|target| bodies.get(target).ok()) {
            effect.position = body.position + effect.follow_offset;
        }

        effect.alpha = effect.life_fraction();
        match effect.kind {
            EffectKind::Hit | EffectKind::HeavyHit | EffectKind::Clash | EffectKind::BlockSpark => {
                effect.scale = 1.0 + (1.0 - effect.life_fraction()) * 0.5;
            }
            EffectKind::Dust => effect.position.y -= DUST_RISE * dt,
            _ => {}
        }
    }

    let expired = pools.effects.release_where(|effect| effect.lifetime_secs <= 0.0);
    if expired > 0 {
        trace!("Released {} expired effects", expired);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hitstun_flashes_red_in_50ms_bands() {
        let mut world = World::new();
        let mut combat = CombatState::default();
        combat.enter_hurt(120.0);
        let body = Body::new(Vec2::new(100.0, 300.0), (64.0, 96.0), Facing::Left, 1);
        let entity = world.spawn((combat, body, Visual::default())).id();

        let mut schedule = Schedule::default();
        schedule.add_systems(apply_visual_modifiers);
        schedule.run(&mut world);

        // floor(120 / 50) = 2 is even: flashing
        let visual = world.get::<Visual>(entity).unwrap();
        assert_eq!(visual.tint, HIT_RED);
        assert_eq!(visual.alpha, 0.7);
        assert_eq!(visual.scale, 0.95);
        assert!(visual.flip_x);

        world.get_mut::<CombatState>(entity).unwrap().hitstun_ms = 60.0;
        schedule.run(&mut world);
        let visual = world.get::<Visual>(entity).unwrap();
        assert_eq!(visual.tint, WHITE);
        assert_eq!(visual.alpha, 1.0);
    }
}
