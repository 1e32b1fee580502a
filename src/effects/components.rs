//! Effect palette and per-fighter effect timers.

use bevy::prelude::*;

use crate::animation::Rgba;

pub const HIT_SPARK: Rgba = [1.0, 0.85, 0.3, 1.0];
pub const HEAVY_SPARK: Rgba = [1.0, 0.45, 0.1, 1.0];
pub const BLOCK_SPARK: Rgba = [0.55, 0.8, 1.0, 1.0];
pub const CLASH_FLASH: Rgba = [1.0, 1.0, 1.0, 1.0];
pub const DUST_BROWN: Rgba = [0.6, 0.5, 0.4, 0.8];
pub const AURA_BLUE: Rgba = [0.3, 0.6, 1.0, 0.6];
pub const DAMAGE_TEXT: Rgba = [1.0, 1.0, 1.0, 1.0];
pub const CRIT_TEXT: Rgba = [1.0, 0.9, 0.0, 1.0];

/// Damage above this always gets the heavy spark.
pub const HEAVY_HIT_DAMAGE: f32 = 20.0;

/// Minimum time between two dust clouds of one fighter.
pub const DUST_COOLDOWN_MS: f64 = 100.0;

/// Horizontal speed above which running kicks up dust.
pub const DUST_SPEED: f32 = 200.0;

pub const AFTERIMAGE_INTERVAL_MS: f64 = 50.0;

/// When each fighter last spawned a rate-limited effect.
#[derive(Component, Debug, Clone)]
pub struct EffectCooldowns {
    pub last_dust_ms: f64,
    pub last_afterimage_ms: f64,
}

impl Default for EffectCooldowns {
    fn default() -> Self {
        Self {
            last_dust_ms: f64::NEG_INFINITY,
            last_afterimage_ms: f64::NEG_INFINITY,
        }
    }
}
