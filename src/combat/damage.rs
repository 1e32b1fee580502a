//! Pure combat formulas.

use bevy::prelude::*;

use crate::entities::Facing;

/// Strength used for projectile damage, which does not scale with the thrower.
pub const NEUTRAL_STRENGTH: f32 = 10.0;

pub const CRIT_MULTIPLIER: f32 = 1.5;

/// Fraction of a blocked hit's horizontal knockback that still applies.
pub const BLOCK_PUSHBACK: f32 = 0.3;

/// `max(0.5, 1 - 0.1 * count)`, where `count` is the combo before this hit.
pub fn combo_scaling(combo_count: u32) -> f32 {
    (1.0 - 0.1 * combo_count as f32).max(0.5)
}

/// Final damage of a clean hit, floored to a whole number.
pub fn compute_damage(
    base: f32,
    attacker_strength: f32,
    defender_defense: f32,
    combo_count: u32,
    critical: bool,
) -> f32 {
    let strength_bonus = 1.0 + (attacker_strength - NEUTRAL_STRENGTH) / 100.0;
    let defense_reduction = 1.0 - (defender_defense / 100.0).clamp(0.0, 0.9);
    let crit = if critical { CRIT_MULTIPLIER } else { 1.0 };
    (base * strength_bonus * defense_reduction * combo_scaling(combo_count) * crit)
        .floor()
        .max(0.0)
}

/// Damage that gets through a block. Only special-tier attacks chip.
pub fn chip_damage(damage: f32) -> f32 {
    (damage * 0.1).floor().max(0.0)
}

/// Meter gained by the attacker for a clean hit.
pub fn meter_gain(damage: f32) -> f32 {
    (damage * 0.5).floor().max(0.0)
}

/// `+1` when the defender should be pushed right, `-1` when left.
pub fn away_direction(attacker_x: f32, defender_x: f32, attacker_facing: Facing) -> f32 {
    if defender_x > attacker_x {
        1.0
    } else if defender_x < attacker_x {
        -1.0
    } else {
        attacker_facing.sign()
    }
}

/// Knockback of a clean hit: horizontal component away from the attacker.
pub fn hit_knockback(knockback: Vec2, direction: f32, scale: f32) -> Vec2 {
    Vec2::new(knockback.x.abs() * direction * scale, knockback.y * scale)
}

/// Pushback of a blocked hit: reduced horizontal shove, no vertical launch.
pub fn block_knockback(knockback: Vec2, direction: f32, scale: f32) -> Vec2 {
    Vec2::new(BLOCK_PUSHBACK * knockback.x.abs() * direction * scale, 0.0)
}

/// `health·10 + max_combo·50 + dealt·2 + max(0, 1000 − elapsed_ms/100)`.
pub fn battle_score(health: f32, max_combo: u32, damage_dealt: f32, elapsed_ms: f64) -> u32 {
    let time_bonus = (1000.0 - elapsed_ms / 100.0).max(0.0);
    let score = health.max(0.0) as f64 * 10.0
        + max_combo as f64 * 50.0
        + damage_dealt.max(0.0) as f64 * 2.0
        + time_bonus;
    score.floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worked_example() {
        // strength 20, defense 20, base 20, no combo, no crit
        let damage = compute_damage(20.0, 20.0, 20.0, 0, false);
        assert_eq!(damage, 17.0);
        assert_eq!(meter_gain(damage), 8.0);
    }

    #[test]
    fn combo_scaling_bottoms_out_at_half() {
        assert_eq!(combo_scaling(0), 1.0);
        assert!((combo_scaling(3) - 0.7).abs() < 1e-6);
        assert_eq!(combo_scaling(5), 0.5);
        assert_eq!(combo_scaling(12), 0.5);
    }

    #[test]
    fn defense_reduction_is_capped() {
        // 95 defense is treated as 90
        assert_eq!(compute_damage(100.0, 10.0, 95.0, 0, false), 10.0);
        // negative defense gives no bonus
        assert_eq!(compute_damage(100.0, 10.0, -20.0, 0, false), 100.0);
    }

    #[test]
    fn crits_multiply_before_flooring() {
        assert_eq!(compute_damage(10.0, 10.0, 0.0, 0, true), 15.0);
        assert_eq!(compute_damage(15.0, 10.0, 0.0, 0, true), 22.0);
    }

    #[test]
    fn chip_is_a_tenth() {
        assert_eq!(chip_damage(30.0), 3.0);
        assert_eq!(chip_damage(9.0), 0.0);
    }

    #[test]
    fn knockback_points_away_from_attacker() {
        let kb = Vec2::new(150.0, -50.0);
        assert_eq!(hit_knockback(kb, -1.0, 1.0), Vec2::new(-150.0, -50.0));
        assert_eq!(hit_knockback(kb, 1.0, 0.5), Vec2::new(75.0, -25.0));
        assert_eq!(block_knockback(kb, 1.0, 1.0), Vec2::new(45.0, 0.0));
        assert_eq!(away_direction(100.0, 100.0, Facing::Left), -1.0);
    }

    #[test]
    fn score_formula() {
        // 50 hp, combo 3, 40 dealt, 30 s elapsed
        assert_eq!(battle_score(50.0, 3, 40.0, 30_000.0), 500 + 150 + 80 + 700);
        // time bonus never goes negative
        assert_eq!(battle_score(0.0, 0, 0.0, 200_000.0), 0);
    }
}
