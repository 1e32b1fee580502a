//! Pool-resident records: projectiles, effects, particles, texts and sprites.
//!
//! These never become ECS entities. They are acquired from `ObjectPools`,
//! updated by the simulation systems and released when they expire.

use bevy::prelude::*;

use crate::animation::{DrawableRef, Rgba, WHITE};
use crate::collision::Hitbox;
use crate::pool::Poolable;

/// A flying attack with an embedded, always-active hitbox.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub owner: Entity,
    pub position: Vec2,
    pub velocity: Vec2,
    pub hitbox: Hitbox,
    /// Seconds left before the projectile fizzles
    pub lifetime_secs: f32,
    pub max_lifetime_secs: f32,
    pub rotation: f32,
    pub anim_frame: u32,
    pub anim_ticks: u32,
}

impl Default for Projectile {
    fn default() -> Self {
        Self {
            owner: Entity::PLACEHOLDER,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            hitbox: Hitbox::default(),
            lifetime_secs: 0.0,
            max_lifetime_secs: 0.0,
            rotation: 0.0,
            anim_frame: 0,
            anim_ticks: 0,
        }
    }
}

impl Poolable for Projectile {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EffectKind {
    #[default]
    Hit,
    HeavyHit,
    BlockSpark,
    Clash,
    Dust,
    Aura,
    /// Whiff trail of a special move
    Swoosh,
}

impl EffectKind {
    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::Hit => "hit",
            EffectKind::HeavyHit => "heavy_hit",
            EffectKind::BlockSpark => "block_spark",
            EffectKind::Clash => "clash",
            EffectKind::Dust => "dust",
            EffectKind::Aura => "aura",
            EffectKind::Swoosh => "swoosh",
        }
    }
}

/// A short-lived visual effect, optionally pinned to a fighter.
#[derive(Debug, Clone)]
pub struct Effect {
    pub kind: EffectKind,
    pub position: Vec2,
    pub follow: Option<Entity>,
    pub follow_offset: Vec2,
    pub lifetime_secs: f32,
    pub max_lifetime_secs: f32,
    pub scale: f32,
    pub alpha: f32,
    pub rotation: f32,
    pub color: Rgba,
}

impl Default for Effect {
    fn default() -> Self {
        Self {
            kind: EffectKind::default(),
            position: Vec2::ZERO,
            follow: None,
            follow_offset: Vec2::ZERO,
            lifetime_secs: 0.0,
            max_lifetime_secs: 0.0,
            scale: 1.0,
            alpha: 1.0,
            rotation: 0.0,
            color: WHITE,
        }
    }
}

impl Poolable for Effect {}

impl Effect {
    pub fn spawn(&mut self, kind: EffectKind, position: Vec2, lifetime_secs: f32, color: Rgba) {
        self.kind = kind;
        self.position = position;
        self.lifetime_secs = lifetime_secs;
        self.max_lifetime_secs = lifetime_secs;
        self.color = color;
    }

    /// Remaining life in `[0, 1]`.
    pub fn life_fraction(&self) -> f32 {
        if self.max_lifetime_secs <= 0.0 {
            return 0.0;
        }
        (self.lifetime_secs / self.max_lifetime_secs).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Downward acceleration in px/s²
    pub gravity: f32,
    pub lifetime_secs: f32,
    pub max_lifetime_secs: f32,
    pub size: f32,
    pub alpha: f32,
    pub color: Rgba,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            gravity: 0.0,
            lifetime_secs: 0.0,
            max_lifetime_secs: 0.0,
            size: 1.0,
            alpha: 1.0,
            color: WHITE,
        }
    }
}

impl Poolable for Particle {}

/// Floating damage number.
#[derive(Debug, Clone)]
pub struct FloatingText {
    pub text: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub lifetime_secs: f32,
    pub max_lifetime_secs: f32,
    pub scale: f32,
    pub alpha: f32,
    pub color: Rgba,
    pub critical: bool,
}

impl Default for FloatingText {
    fn default() -> Self {
        Self {
            text: String::new(),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            lifetime_secs: 0.0,
            max_lifetime_secs: 0.0,
            scale: 1.0,
            alpha: 1.0,
            color: WHITE,
            critical: false,
        }
    }
}

impl Poolable for FloatingText {
    fn reset(&mut self) {
        let mut text = std::mem::take(&mut self.text);
        text.clear();
        *self = FloatingText {
            text,
            ..FloatingText::default()
        };
    }
}

/// A detached copy of a fighter frame, used for dash afterimages.
#[derive(Debug, Clone)]
pub struct SpriteInstance {
    pub owner: Entity,
    pub drawable: DrawableRef,
    pub position: Vec2,
    pub flip_x: bool,
    pub alpha: f32,
    pub tint: Rgba,
    pub lifetime_secs: f32,
    pub max_lifetime_secs: f32,
}

impl Default for SpriteInstance {
    fn default() -> Self {
        Self {
            owner: Entity::PLACEHOLDER,
            drawable: DrawableRef::default(),
            position: Vec2::ZERO,
            flip_x: false,
            alpha: 1.0,
            tint: WHITE,
            lifetime_secs: 0.0,
            max_lifetime_secs: 0.0,
        }
    }
}

impl Poolable for SpriteInstance {}
