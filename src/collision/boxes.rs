//! Hit and hurt geometry.
//!
//! All boxes are axis-aligned. Offsets point from a fighter's feet to the box
//! centre; hitbox offsets are mirrored when the owner faces left, hurtbox
//! offsets never are.

use bevy::prelude::*;

use crate::config::{HitboxKind, HitboxTemplate, HurtboxShape, Knockdown, MoveTier};
use crate::entities::Facing;
use crate::pool::{PoolId, Poolable};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Body box standing on `feet`.
    pub fn from_feet(feet: Vec2, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(feet.x - width * 0.5, feet.y - height),
            max: Vec2::new(feet.x + width * 0.5, feet.y),
        }
    }

    /// Touching edges count as overlap.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

/// Where a hitbox came from. Part of the per-tick dedupe key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitSource {
    /// Index of the move's active range that produced the box
    Strike { range: u8 },
    Projectile(PoolId),
}

impl Default for HitSource {
    fn default() -> Self {
        HitSource::Strike { range: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HurtboxKind {
    #[default]
    Normal,
    /// Never collides
    Invulnerable,
    /// Strikes landing here are countered
    Counter,
    /// Takes damage without flinching
    Armor,
}

/// An attack volume. Strike hitboxes live in the hitbox pool for one tick;
/// projectiles carry one for their whole flight.
#[derive(Debug, Clone)]
pub struct Hitbox {
    pub owner: Entity,
    pub source: HitSource,
    pub kind: HitboxKind,
    pub priority: u8,
    pub tier: MoveTier,
    pub offset: Vec2,
    pub size: Vec2,
    pub damage: f32,
    pub hitstun_ms: f32,
    pub blockstun_ms: f32,
    pub knockback: Vec2,
    /// Ticks both sides freeze when this box connects
    pub hitstop_frames: u32,
    pub knockdown: Option<Knockdown>,
    /// Inclusive `[start, end]` frame windows. Empty means always active.
    pub active_frames: Vec<(u32, u32)>,
    pub current_frame: u32,
    pub active: bool,
    pub bounds: Aabb,
}

impl Default for Hitbox {
    fn default() -> Self {
        Self {
            owner: Entity::PLACEHOLDER,
            source: HitSource::default(),
            kind: HitboxKind::Strike,
            priority: 1,
            tier: MoveTier::Normal,
            offset: Vec2::ZERO,
            size: Vec2::ZERO,
            damage: 0.0,
            hitstun_ms: 0.0,
            blockstun_ms: 0.0,
            knockback: Vec2::ZERO,
            hitstop_frames: 0,
            knockdown: None,
            active_frames: Vec::new(),
            current_frame: 0,
            active: false,
            bounds: Aabb::default(),
        }
    }
}

impl Poolable for Hitbox {
    fn reset(&mut self) {
        let mut frames = std::mem::take(&mut self.active_frames);
        frames.clear();
        *self = Hitbox {
            active_frames: frames,
            ..Hitbox::default()
        };
    }
}

impl Hitbox {
    /// Fill from move data for `owner`.
    pub fn load_template(&mut self, owner: Entity, template: &HitboxTemplate, tier: MoveTier) {
        self.owner = owner;
        self.kind = template.kind;
        self.priority = template.priority;
        self.tier = tier;
        self.offset = Vec2::from(template.offset);
        self.size = Vec2::from(template.size);
        self.damage = template.damage;
        self.hitstun_ms = template.hitstun_ms;
        self.blockstun_ms = template.blockstun_ms;
        self.knockback = Vec2::from(template.knockback);
        self.active_frames.clear();
        self.active_frames.extend_from_slice(&template.active_frames);
    }

    /// Set the current frame and recompute whether the box is live.
    pub fn update_frame(&mut self, frame: u32) {
        self.current_frame = frame;
        if self.active_frames.is_empty() {
            self.active = true;
            return;
        }
        match self
            .active_frames
            .iter()
            .position(|&(start, end)| frame >= start && frame <= end)
        {
            Some(range) => {
                self.active = true;
                if matches!(self.source, HitSource::Strike { .. }) {
                    self.source = HitSource::Strike { range: range as u8 };
                }
            }
            None => self.active = false,
        }
    }

    /// Recompute world bounds around `anchor`, mirroring the offset by facing.
    pub fn place(&mut self, anchor: Vec2, facing: Facing) {
        let center = anchor + Vec2::new(self.offset.x * facing.sign(), self.offset.y);
        self.bounds = Aabb::from_center_size(center, self.size);
    }
}

/// A vulnerable volume of a fighter, rebuilt every tick.
#[derive(Debug, Clone, Copy)]
pub struct Hurtbox {
    pub owner: Entity,
    pub kind: HurtboxKind,
    pub bounds: Aabb,
    pub damage_multiplier: f32,
}

impl Hurtbox {
    pub fn from_shape(owner: Entity, kind: HurtboxKind, shape: &HurtboxShape, feet: Vec2) -> Self {
        let center = feet + Vec2::from(shape.offset);
        let damage_multiplier = match kind {
            HurtboxKind::Armor => shape.damage_multiplier * 0.5,
            _ => shape.damage_multiplier,
        };
        Self {
            owner,
            kind,
            bounds: Aabb::from_center_size(center, Vec2::from(shape.size)),
            damage_multiplier,
        }
    }
}
