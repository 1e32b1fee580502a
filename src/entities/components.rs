//! Plain data components of a fighter entity.

use bevy::prelude::*;

use crate::config::{ArenaConfig, FighterConfig};

/// Which corner a fighter fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Player,
    Boss,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Player => Side::Boss,
            Side::Boss => Side::Player,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// `+1` facing right, `-1` facing left.
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing that looks from `from_x` towards `to_x`.
    pub fn towards(from_x: f32, to_x: f32) -> Facing {
        if to_x < from_x {
            Facing::Left
        } else {
            Facing::Right
        }
    }
}

/// Marker and identity of a fighter.
#[derive(Component, Debug, Clone)]
pub struct Fighter {
    pub side: Side,
    /// Entity type for animation catalog lookups
    pub archetype: String,
}

/// Kinematic body. `position` is the bottom-centre (feet) of the body box.
#[derive(Component, Debug, Clone)]
pub struct Body {
    pub position: Vec2,
    pub previous_position: Vec2,
    pub velocity: Vec2,
    pub width: f32,
    pub height: f32,
    pub facing: Facing,
    pub grounded: bool,
    pub jumps_remaining: u32,
    pub max_jumps: u32,
    pub crouching: bool,
    /// Ticks left in the current dash
    pub dash_frames: u32,
}

impl Body {
    pub fn new(position: Vec2, size: (f32, f32), facing: Facing, max_jumps: u32) -> Self {
        Self {
            position,
            previous_position: position,
            velocity: Vec2::ZERO,
            width: size.0,
            height: size.1,
            facing,
            grounded: true,
            jumps_remaining: max_jumps,
            max_jumps,
            crouching: false,
            dash_frames: 0,
        }
    }

    pub fn is_dashing(&self) -> bool {
        self.dash_frames > 0
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

/// Component for entities that can take damage.
#[derive(Component, Debug, Clone)]
pub struct Health {
    pub current: f32,
    pub maximum: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            maximum: max,
        }
    }

    /// Remove up to `amount`, returning what was actually taken.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let actual = amount.max(0.0).min(self.current);
        self.current -= actual;
        actual
    }

    pub fn heal(&mut self, amount: f32) -> f32 {
        let actual = amount.max(0.0).min(self.maximum - self.current);
        self.current += actual;
        actual
    }

    pub fn clamp(&mut self) {
        self.current = self.current.clamp(0.0, self.maximum);
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn percentage(&self) -> f32 {
        if self.maximum <= 0.0 {
            return 0.0;
        }
        self.current / self.maximum
    }
}

/// Combat stats copied from the fighter config.
#[derive(Component, Debug, Clone)]
pub struct FighterStats {
    pub strength: f32,
    pub defense: f32,
    pub speed: f32,
    pub crit_chance: f32,
    pub armored: bool,
}

impl From<&FighterConfig> for FighterStats {
    fn from(config: &FighterConfig) -> Self {
        Self {
            strength: config.strength,
            defense: config.defense,
            speed: config.speed,
            crit_chance: config.crit_chance,
            armored: config.armored,
        }
    }
}

/// Arena bounds for the current battle.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub floor_y: f32,
}

impl Default for Arena {
    fn default() -> Self {
        ArenaConfig::default().into()
    }
}

impl From<ArenaConfig> for Arena {
    fn from(config: ArenaConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            floor_y: config.floor_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_stays_in_range() {
        let mut health = Health::new(100.0);
        assert_eq!(health.take_damage(130.0), 100.0);
        assert_eq!(health.current, 0.0);
        assert!(health.is_dead());
        assert_eq!(health.heal(500.0), 100.0);
        assert_eq!(health.current, 100.0);
        assert_eq!(health.take_damage(-5.0), 0.0);
    }

    #[test]
    fn facing_towards_opponent() {
        assert_eq!(Facing::towards(100.0, 700.0), Facing::Right);
        assert_eq!(Facing::towards(700.0, 100.0), Facing::Left);
        assert_eq!(Facing::Left.sign(), -1.0);
    }
}
