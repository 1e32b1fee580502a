//! The pool set shared by every system of a battle.

use bevy::prelude::*;

use super::object_pool::{ObjectPool, PoolConfig, PoolStats, PoolType, Poolable};
use crate::collision::Hitbox;
use crate::entities::{Effect, FloatingText, Particle, Projectile, SpriteInstance};

/// Type-erased maintenance operations, so cleanup can walk every pool.
pub trait PoolMaintenance {
    fn pool_type(&self) -> PoolType;
    fn config(&self) -> &PoolConfig;
    fn stats(&self) -> &PoolStats;
    fn active_count(&self) -> usize;
    fn available_count(&self) -> usize;
    fn release_all(&mut self) -> usize;
    fn trim_available(&mut self, keep: usize) -> usize;
    fn release_idle(&mut self, now_ms: f64, idle_ms: f64) -> usize;
    fn release_oldest_fraction(&mut self, fraction: f32) -> usize;
    fn set_growth_ceiling(&mut self, ceiling: f32);
    fn record_cleanup(&mut self);
}

impl<T: Poolable> PoolMaintenance for ObjectPool<T> {
    fn pool_type(&self) -> PoolType {
        ObjectPool::pool_type(self)
    }

    fn config(&self) -> &PoolConfig {
        ObjectPool::config(self)
    }

    fn stats(&self) -> &PoolStats {
        ObjectPool::stats(self)
    }

    fn active_count(&self) -> usize {
        ObjectPool::active_count(self)
    }

    fn available_count(&self) -> usize {
        ObjectPool::available_count(self)
    }

    fn release_all(&mut self) -> usize {
        ObjectPool::release_all(self)
    }

    fn trim_available(&mut self, keep: usize) -> usize {
        ObjectPool::trim_available(self, keep)
    }

    fn release_idle(&mut self, now_ms: f64, idle_ms: f64) -> usize {
        ObjectPool::release_idle(self, now_ms, idle_ms)
    }

    fn release_oldest_fraction(&mut self, fraction: f32) -> usize {
        ObjectPool::release_oldest_fraction(self, fraction)
    }

    fn set_growth_ceiling(&mut self, ceiling: f32) {
        ObjectPool::set_growth_ceiling(self, ceiling)
    }

    fn record_cleanup(&mut self) {
        ObjectPool::record_cleanup(self)
    }
}

/// One pool per transient object family.
#[derive(Resource)]
pub struct ObjectPools {
    pub projectiles: ObjectPool<Projectile>,
    pub effects: ObjectPool<Effect>,
    pub particles: ObjectPool<Particle>,
    pub hitboxes: ObjectPool<Hitbox>,
    pub texts: ObjectPool<FloatingText>,
    pub sprites: ObjectPool<SpriteInstance>,
}

impl Default for ObjectPools {
    fn default() -> Self {
        Self {
            projectiles: ObjectPool::new(PoolType::Projectile),
            effects: ObjectPool::new(PoolType::Effect),
            particles: ObjectPool::new(PoolType::Particle),
            hitboxes: ObjectPool::new(PoolType::Hitbox),
            texts: ObjectPool::new(PoolType::Text),
            sprites: ObjectPool::new(PoolType::Sprite),
        }
    }
}

impl ObjectPools {
    pub fn each(&self) -> [&dyn PoolMaintenance; 6] {
        [
            &self.projectiles,
            &self.effects,
            &self.particles,
            &self.hitboxes,
            &self.texts,
            &self.sprites,
        ]
    }

    pub fn each_mut(&mut self) -> [&mut dyn PoolMaintenance; 6] {
        [
            &mut self.projectiles,
            &mut self.effects,
            &mut self.particles,
            &mut self.hitboxes,
            &mut self.texts,
            &mut self.sprites,
        ]
    }

    /// Release every active object in every pool. Objects are reset, not destroyed.
    pub fn release_all(&mut self) -> usize {
        self.each_mut()
            .into_iter()
            .map(|pool| pool.release_all())
            .sum()
    }

    pub fn total_active(&self) -> usize {
        self.each().iter().map(|pool| pool.active_count()).sum()
    }

    pub fn total_objects(&self) -> usize {
        self.each()
            .iter()
            .map(|pool| pool.active_count() + pool.available_count())
            .sum()
    }

    pub fn set_growth_ceiling(&mut self, ceiling: f32) {
        for pool in self.each_mut() {
            pool.set_growth_ceiling(ceiling);
        }
    }

    pub fn stats(&self) -> Vec<(PoolType, PoolStats)> {
        self.each()
            .iter()
            .map(|pool| (pool.pool_type(), pool.stats().clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pools_preallocate() {
        let pools = ObjectPools::default();
        assert_eq!(pools.total_active(), 0);
        assert_eq!(pools.total_objects(), 10 + 20 + 50 + 5 + 10 + 20);
    }

    #[test]
    fn release_all_drains_every_pool() {
        let mut pools = ObjectPools::default();
        pools.projectiles.acquire(0.0);
        pools.effects.acquire(0.0);
        pools.particles.acquire(0.0);
        pools.texts.acquire(0.0);
        assert_eq!(pools.total_active(), 4);
        assert_eq!(pools.release_all(), 4);
        assert_eq!(pools.total_active(), 0);
    }
}
