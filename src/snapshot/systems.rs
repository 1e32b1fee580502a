use bevy::prelude::*;

use crate::animation::{AnimationCatalog, Clip, DrawableRef, Rgba, SpriteAnimation, Visual};
use crate::combat::{CombatState, FighterState};
use crate::core::SimClock;
use crate::entities::{Body, EffectKind, Fighter, HudState, Side};
use crate::pool::ObjectPools;

#[derive(Debug, Clone, PartialEq)]
pub struct FighterSnapshot {
    pub entity: Entity,
    pub side: Side,
    pub state: FighterState,
    pub clip: Clip,
    pub frame: u32,
    pub drawable: DrawableRef,
    pub previous_position: Vec2,
    pub position: Vec2,
    pub visual: Visual,
}

impl FighterSnapshot {
    /// Position between the last two ticks.
    pub fn interpolated(&self, alpha: f32) -> Vec2 {
        self.previous_position.lerp(self.position, alpha.clamp(0.0, 1.0))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileSnapshot {
    pub owner: Entity,
    pub position: Vec2,
    pub rotation: f32,
    pub frame: u32,
    pub flip_x: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectSnapshot {
    pub kind: EffectKind,
    pub position: Vec2,
    pub scale: f32,
    pub alpha: f32,
    pub rotation: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSnapshot {
    pub position: Vec2,
    pub size: f32,
    pub alpha: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextSnapshot {
    pub text: String,
    pub position: Vec2,
    pub scale: f32,
    pub alpha: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AfterimageSnapshot {
    pub drawable: DrawableRef,
    pub position: Vec2,
    pub flip_x: bool,
    pub alpha: f32,
    pub tint: Rgba,
}

/// Everything a renderer draws for one frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct RenderSnapshot {
    pub tick: u64,
    /// Fraction of a tick left in the accumulator, for interpolation only
    pub alpha: f32,
    pub fighters: Vec<FighterSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub effects: Vec<EffectSnapshot>,
    pub particles: Vec<ParticleSnapshot>,
    pub texts: Vec<TextSnapshot>,
    pub afterimages: Vec<AfterimageSnapshot>,
    pub hud: HudState,
}

impl RenderSnapshot {
    pub fn fighter(&self, side: Side) -> Option<&FighterSnapshot> {
        self.fighters.iter().find(|fighter| fighter.side == side)
    }
}

/// Last system of every tick.
pub fn publish_snapshot(
    clock: Res<SimClock>,
    catalog: Res<AnimationCatalog>,
    pools: Res<ObjectPools>,
    hud: Res<HudState>,
    mut snapshot: ResMut<RenderSnapshot>,
    fighters: Query<(Entity, &Fighter, &Body, &CombatState, &SpriteAnimation, &Visual)>,
) {
    let snapshot = &mut *snapshot;
    snapshot.tick = clock.tick;

    snapshot.fighters.clear();
    for (entity, fighter, body, combat, animation, visual) in fighters.iter() {
        snapshot.fighters.push(FighterSnapshot {
            entity,
            side: fighter.side,
            state: combat.state,
            clip: animation.current,
            frame: animation.frame,
            drawable: catalog.drawable(&fighter.archetype, animation.current, animation.frame),
            previous_position: body.previous_position,
            position: body.position,
            visual: visual.clone(),
        });
    }
    snapshot.fighters.sort_by_key(|fighter| fighter.side);

    snapshot.projectiles.clear();
    snapshot
        .projectiles
        .extend(pools.projectiles.iter().map(|(_, projectile)| ProjectileSnapshot {
            owner: projectile.owner,
            position: projectile.position,
            rotation: projectile.rotation,
            frame: projectile.anim_frame,
            flip_x: projectile.velocity.x < 0.0,
        }));

    snapshot.effects.clear();
    snapshot
        .effects
        .extend(pools.effects.iter().map(|(_, effect)| EffectSnapshot {
            kind: effect.kind,
            position: effect.position,
            scale: effect.scale,
            alpha: effect.alpha,
            rotation: effect.rotation,
            color: effect.color,
        }));

    snapshot.particles.clear();
    snapshot
        .particles
        .extend(pools.particles.iter().map(|(_, particle)| ParticleSnapshot {
            position: particle.position,
            size: particle.size,
            alpha: particle.alpha,
            color: particle.color,
        }));

    snapshot.texts.clear();
    snapshot
        .texts
        .extend(pools.texts.iter().map(|(_, text)| TextSnapshot {
            text: text.text.clone(),
            position: text.position,
            scale: text.scale,
            alpha: text.alpha,
            color: text.color,
        }));

    snapshot.afterimages.clear();
    snapshot
        .afterimages
        .extend(pools.sprites.iter().map(|(_, sprite)| AfterimageSnapshot {
            drawable: sprite.drawable.clone(),
            position: sprite.position,
            flip_x: sprite.flip_x,
            alpha: sprite.alpha,
            tint: sprite.tint,
        }));

    snapshot.hud = hud.clone();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolation_is_clamped() {
        let fighter = FighterSnapshot {
            entity: Entity::PLACEHOLDER,
            side: Side::Player,
            state: FighterState::Walking,
            clip: Clip::Walking,
            frame: 0,
            drawable: DrawableRef::default(),
            previous_position: Vec2::new(100.0, 300.0),
            position: Vec2::new(110.0, 300.0),
            visual: Visual::default(),
        };
        assert_eq!(fighter.interpolated(0.5), Vec2::new(105.0, 300.0));
        assert_eq!(fighter.interpolated(3.0), fighter.position);
    }
}
