//! Physics systems.
//!
//! `y` grows downwards: gravity is positive and a jump is a negative `vy`.
//! Body positions are the feet of the fighter.

use bevy::prelude::*;

use crate::combat::{CombatState, FighterState};
use crate::core::SimClock;
use crate::entities::{Arena, Body, Facing, Fighter};
use crate::pool::ObjectPools;

pub const GRAVITY: f32 = 980.0;
pub const GROUND_FRICTION: f32 = 0.85;
pub const AIR_FRICTION: f32 = 0.98;
pub const MAX_SPEED_X: f32 = 800.0;
pub const MAX_SPEED_Y: f32 = 1000.0;
/// Velocity added to each of two overlapping fighters, away from the other.
pub const SEPARATION_PUSH: f32 = 200.0;
/// Projectiles this far outside the arena are destroyed.
pub const PROJECTILE_MARGIN: f32 = 50.0;

/// Advance one body by `dt` seconds inside `arena`.
pub fn step_body(body: &mut Body, arena: &Arena, dt: f32) {
    if !body.grounded {
        body.velocity.y += GRAVITY * dt;
    }

    body.velocity.x *= if body.grounded {
        GROUND_FRICTION
    } else {
        AIR_FRICTION
    };
    body.velocity.x = body.velocity.x.clamp(-MAX_SPEED_X, MAX_SPEED_X);
    body.velocity.y = body.velocity.y.clamp(-MAX_SPEED_Y, MAX_SPEED_Y);

    body.previous_position = body.position;
    body.position += body.velocity * dt;

    // Side walls
    let half_width = body.width * 0.5;
    if body.position.x < half_width {
        body.position.x = half_width;
        body.velocity.x = 0.0;
    } else if body.position.x > arena.width - half_width {
        body.position.x = arena.width - half_width;
        body.velocity.x = 0.0;
    }

    // Ceiling
    if body.position.y < 0.0 {
        body.position.y = 0.0;
        body.velocity.y = 0.0;
    }

    // Floor
    if body.position.y >= arena.floor_y {
        body.position.y = arena.floor_y;
        body.velocity.y = body.velocity.y.min(0.0);
        body.grounded = true;
        body.jumps_remaining = body.max_jumps;
    } else {
        body.grounded = false;
    }

    if body.dash_frames > 0 {
        body.dash_frames -= 1;
    }
}

/// Step every fighter body. Bodies frozen by hitstop hold still.
pub fn integrate_bodies(
    clock: Res<SimClock>,
    arena: Res<Arena>,
    mut fighters: Query<(Entity, &mut Body, &mut CombatState), With<Fighter>>,
) {
    let dt = clock.dt();
    for (entity, mut body, mut combat) in fighters.iter_mut() {
        if !body.is_finite() {
            debug!("Skipping physics for {:?}: non-finite body", entity);
            continue;
        }
        if combat.hitstop_frames > 0 {
            body.previous_position = body.position;
            continue;
        }
        let was_airborne = !body.grounded;
        step_body(&mut body, &arena, dt);
        if was_airborne && body.grounded && combat.state == FighterState::Jumping {
            combat.state = FighterState::Idle;
        }
    }
}

/// Push overlapping fighters apart, both by velocity and by position.
pub fn separate_fighters(arena: Res<Arena>, mut fighters: Query<&mut Body, With<Fighter>>) {
    let mut pairs = fighters.iter_combinations_mut::<2>();
    while let Some([mut a, mut b]) = pairs.fetch_next() {
        if !a.is_finite() || !b.is_finite() {
            continue;
        }
        let dx = b.position.x - a.position.x;
        let overlap = (a.width + b.width) * 0.5 - dx.abs();
        let vertical_overlap = a.position.y - a.height < b.position.y
            && b.position.y - b.height < a.position.y;
        if overlap <= 0.0 || !vertical_overlap {
            continue;
        }

        // a is pushed towards its side; equal x pushes a left
        let direction = if dx >= 0.0 { 1.0 } else { -1.0 };
        a.velocity.x -= SEPARATION_PUSH * direction;
        b.velocity.x += SEPARATION_PUSH * direction;
        let correction = overlap * 0.5;
        a.position.x -= correction * direction;
        b.position.x += correction * direction;
        clamp_to_walls(&mut a, &arena);
        clamp_to_walls(&mut b, &arena);
    }
}

fn clamp_to_walls(body: &mut Body, arena: &Arena) {
    let half_width = body.width * 0.5;
    body.position.x = body.position.x.min(arena.width - half_width).max(half_width);
}

/// Fly projectiles and release the spent ones.
pub fn move_projectiles(clock: Res<SimClock>, arena: Res<Arena>, mut pools: ResMut<ObjectPools>) {
    let dt = clock.dt();
    let mut expired = Vec::new();

    for (id, projectile) in pools.projectiles.iter_mut() {
        projectile.position += projectile.velocity * dt;
        projectile.lifetime_secs -= dt;
        let facing = if projectile.velocity.x < 0.0 {
            Facing::Left
        } else {
            Facing::Right
        };
        let position = projectile.position;
        projectile.hitbox.place(position, facing);

        let out_of_bounds = projectile.position.x < -PROJECTILE_MARGIN
            || projectile.position.x > arena.width + PROJECTILE_MARGIN;
        if projectile.lifetime_secs <= 0.0 || out_of_bounds || !projectile.position.is_finite() {
            expired.push(id);
        }
    }

    for id in expired {
        pools.projectiles.release(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airborne_body() -> Body {
        let mut body = Body::new(Vec2::new(400.0, 100.0), (64.0, 96.0), Facing::Right, 1);
        body.grounded = false;
        body
    }

    #[test]
    fn one_tick_of_gravity() {
        let arena = Arena::default();
        let dt = 1.0 / 60.0;
        let mut body = airborne_body();
        step_body(&mut body, &arena, dt);
        assert!((body.velocity.y - GRAVITY * dt).abs() < 1e-3);
        assert!(body.position.y > 100.0);
    }

    #[test]
    fn falls_monotonically_until_landing() {
        let arena = Arena::default();
        let dt = 1.0 / 60.0;
        let mut body = airborne_body();
        let mut last_y = body.position.y;
        for _ in 0..600 {
            step_body(&mut body, &arena, dt);
            assert!(body.position.y >= last_y);
            last_y = body.position.y;
            if body.grounded {
                break;
            }
        }
        assert!(body.grounded);
        assert_eq!(body.position.y, arena.floor_y);
        assert_eq!(body.velocity.y, 0.0);
        assert_eq!(body.jumps_remaining, 1);
    }

    #[test]
    fn walls_stop_horizontal_motion() {
        let arena = Arena::default();
        let mut body = Body::new(Vec2::new(40.0, 300.0), (64.0, 96.0), Facing::Left, 1);
        body.velocity.x = -700.0;
        step_body(&mut body, &arena, 1.0 / 60.0);
        assert_eq!(body.position.x, 32.0);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn speed_is_clamped() {
        let arena = Arena::default();
        let mut body = airborne_body();
        body.velocity = Vec2::new(5000.0, 5000.0);
        step_body(&mut body, &arena, 1.0 / 60.0);
        assert!(body.velocity.x.abs() <= MAX_SPEED_X);
        assert!(body.velocity.y.abs() <= MAX_SPEED_Y);
    }

    #[test]
    fn dash_lasts_its_frames() {
        let arena = Arena::default();
        let mut body = Body::new(Vec2::new(400.0, 300.0), (64.0, 96.0), Facing::Right, 1);
        body.dash_frames = 10;
        for _ in 0..9 {
            step_body(&mut body, &arena, 1.0 / 60.0);
        }
        assert!(body.is_dashing());
        step_body(&mut body, &arena, 1.0 / 60.0);
        assert!(!body.is_dashing());
    }
}
