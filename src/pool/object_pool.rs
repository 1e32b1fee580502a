//! A typed, adaptive object pool.
//!
//! Objects are recycled rather than freed. `acquire` never fails: when the
//! pool is at its effective maximum the least-recently-used active object is
//! reclaimed. Every acquisition hands out a fresh `PoolId`, so a stale id
//! never aliases a recycled object.

use std::collections::BTreeMap;

use bevy::prelude::*;

/// Handle to an active pooled object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(pub u64);

/// Types that can live in an `ObjectPool`.
pub trait Poolable: Default + Send + Sync + 'static {
    /// Return the object to its blank state.
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The six transient object families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PoolType {
    Projectile,
    Effect,
    Particle,
    Hitbox,
    Text,
    Sprite,
}

impl PoolType {
    pub const ALL: [PoolType; 6] = [
        PoolType::Projectile,
        PoolType::Effect,
        PoolType::Particle,
        PoolType::Hitbox,
        PoolType::Text,
        PoolType::Sprite,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PoolType::Projectile => "projectile",
            PoolType::Effect => "effect",
            PoolType::Particle => "particle",
            PoolType::Hitbox => "hitbox",
            PoolType::Text => "text",
            PoolType::Sprite => "sprite",
        }
    }

    pub fn default_config(&self) -> PoolConfig {
        let (initial_size, max_size, growth_rate, shrink_threshold) = match self {
            PoolType::Projectile => (10, 30, 5, 0.2),
            PoolType::Effect => (20, 50, 10, 0.3),
            PoolType::Particle => (50, 200, 25, 0.25),
            PoolType::Hitbox => (5, 20, 5, 0.3),
            PoolType::Text => (10, 30, 5, 0.3),
            PoolType::Sprite => (20, 50, 10, 0.3),
        };
        PoolConfig {
            initial_size,
            max_size,
            growth_rate,
            shrink_threshold,
        }
    }
}

/// Sizing rules of one pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolConfig {
    pub initial_size: usize,
    pub max_size: usize,
    pub growth_rate: usize,
    /// Usage ratio under which surplus available objects are dropped
    pub shrink_threshold: f32,
}

/// Bookkeeping attached to every active object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolMeta {
    pub pool_type: PoolType,
    pub id: PoolId,
    pub acquired_ms: f64,
    pub last_used_ms: f64,
}

/// An active object and its metadata.
#[derive(Debug, Clone)]
pub struct Pooled<T> {
    pub meta: PoolMeta,
    pub value: T,
}

/// Lifetime counters of a pool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolStats {
    /// Objects constructed, including preallocation and growth
    pub created: u64,
    pub acquired: u64,
    /// Acquisitions served from the available list
    pub reused: u64,
    /// Acquisitions served by reclaiming an active object
    pub recycled: u64,
    pub released: u64,
    /// Available objects discarded by shrinking or trimming
    pub discarded: u64,
    pub peak_active: usize,
    pub cleanups: u64,
}

impl PoolStats {
    pub fn reuse_rate(&self) -> f32 {
        if self.acquired == 0 {
            return 0.0;
        }
        self.reused as f32 / self.acquired as f32
    }
}

pub struct ObjectPool<T: Poolable> {
    pool_type: PoolType,
    config: PoolConfig,
    available: Vec<T>,
    active: BTreeMap<PoolId, Pooled<T>>,
    next_id: u64,
    high_water: usize,
    growth_ceiling: f32,
    stats: PoolStats,
}

impl<T: Poolable> ObjectPool<T> {
    pub fn new(pool_type: PoolType) -> Self {
        Self::with_config(pool_type, pool_type.default_config())
    }

    pub fn with_config(pool_type: PoolType, mut config: PoolConfig) -> Self {
        config.max_size = config.max_size.max(1);
        config.initial_size = config.initial_size.min(config.max_size);

        let mut pool = Self {
            pool_type,
            config,
            available: Vec::with_capacity(config.initial_size),
            active: BTreeMap::new(),
            next_id: 0,
            high_water: 0,
            growth_ceiling: 1.0,
            stats: PoolStats::default(),
        };
        pool.preallocate(config.initial_size);
        pool
    }

    pub fn pool_type(&self) -> PoolType {
        self.pool_type
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    pub fn total(&self) -> usize {
        self.active.len() + self.available.len()
    }

    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// `max_size` scaled by the quality ceiling, never above `max_size`.
    pub fn effective_max(&self) -> usize {
        let scaled = (self.config.max_size as f32 * self.growth_ceiling).floor() as usize;
        scaled.clamp(1, self.config.max_size)
    }

    /// Cap growth to a fraction of `max_size`. Surplus available objects are dropped.
    pub fn set_growth_ceiling(&mut self, ceiling: f32) {
        self.growth_ceiling = ceiling.clamp(0.0, 1.0);
        let max = self.effective_max();
        while self.total() > max && self.available.pop().is_some() {
            self.stats.discarded += 1;
        }
    }

    /// Take an object from the pool. Never fails.
    pub fn acquire(&mut self, now_ms: f64) -> PoolId {
        let mut value = if let Some(value) = self.available.pop() {
            self.stats.reused += 1;
            value
        } else if self.total() < self.effective_max() {
            self.stats.created += 1;
            T::default()
        } else {
            self.reclaim_least_recently_used()
        };
        value.reset();

        let id = PoolId(self.next_id);
        self.next_id += 1;
        self.active.insert(
            id,
            Pooled {
                meta: PoolMeta {
                    pool_type: self.pool_type,
                    id,
                    acquired_ms: now_ms,
                    last_used_ms: now_ms,
                },
                value,
            },
        );

        self.stats.acquired += 1;
        self.stats.peak_active = self.stats.peak_active.max(self.active.len());
        self.grow_if_needed();
        id
    }

    /// Acquire and initialise in one step.
    pub fn acquire_with(&mut self, now_ms: f64, init: impl FnOnce(&mut T)) -> PoolId {
        let id = self.acquire(now_ms);
        if let Some(value) = self.get_mut(id) {
            init(value);
        }
        id
    }

    pub fn get(&self, id: PoolId) -> Option<&T> {
        self.active.get(&id).map(|pooled| &pooled.value)
    }

    pub fn get_mut(&mut self, id: PoolId) -> Option<&mut T> {
        self.active.get_mut(&id).map(|pooled| &mut pooled.value)
    }

    pub fn meta(&self, id: PoolId) -> Option<&PoolMeta> {
        self.active.get(&id).map(|pooled| &pooled.meta)
    }

    pub fn contains(&self, id: PoolId) -> bool {
        self.active.contains_key(&id)
    }

    /// Mark an object as used at `now_ms` (LRU and idle tracking).
    pub fn touch(&mut self, id: PoolId, now_ms: f64) {
        if let Some(pooled) = self.active.get_mut(&id) {
            pooled.meta.last_used_ms = now_ms;
        }
    }

    /// Active objects in acquisition order.
    pub fn iter(&self) -> impl Iterator<Item = (PoolId, &T)> {
        self.active.iter().map(|(id, pooled)| (*id, &pooled.value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PoolId, &mut T)> {
        self.active.iter_mut().map(|(id, pooled)| (*id, &mut pooled.value))
    }

    pub fn ids(&self) -> Vec<PoolId> {
        self.active.keys().copied().collect()
    }

    /// Return an object to the pool. Unknown or stale ids are ignored.
    pub fn release(&mut self, id: PoolId) -> bool {
        if !self.put_back(id) {
            return false;
        }
        self.shrink_if_underused();
        true
    }

    pub fn release_all(&mut self) -> usize {
        let ids = self.ids();
        ids.into_iter().filter(|id| self.put_back(*id)).count()
    }

    /// Release every active object matching `predicate`.
    pub fn release_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let ids: Vec<PoolId> = self
            .active
            .iter()
            .filter(|(_, pooled)| predicate(&pooled.value))
            .map(|(id, _)| *id)
            .collect();
        let released = ids.into_iter().filter(|id| self.put_back(*id)).count();
        if released > 0 {
            self.shrink_if_underused();
        }
        released
    }

    /// Drop available objects until at most `keep` remain.
    pub fn trim_available(&mut self, keep: usize) -> usize {
        let excess = self.available.len().saturating_sub(keep);
        self.available.truncate(keep);
        self.stats.discarded += excess as u64;
        excess
    }

    /// Force-release objects untouched for longer than `idle_ms`.
    pub fn release_idle(&mut self, now_ms: f64, idle_ms: f64) -> usize {
        let ids: Vec<PoolId> = self
            .active
            .iter()
            .filter(|(_, pooled)| now_ms - pooled.meta.last_used_ms > idle_ms)
            .map(|(id, _)| *id)
            .collect();
        ids.into_iter().filter(|id| self.put_back(*id)).count()
    }

    /// Force-release the least recently used `fraction` of active objects.
    pub fn release_oldest_fraction(&mut self, fraction: f32) -> usize {
        let count = (self.active.len() as f32 * fraction.clamp(0.0, 1.0)).floor() as usize;
        let mut by_age: Vec<(f64, PoolId)> = self
            .active
            .iter()
            .map(|(id, pooled)| (pooled.meta.last_used_ms, *id))
            .collect();
        by_age.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        by_age
            .into_iter()
            .take(count)
            .filter(|(_, id)| self.put_back(*id))
            .count()
    }

    pub fn record_cleanup(&mut self) {
        self.stats.cleanups += 1;
    }

    fn put_back(&mut self, id: PoolId) -> bool {
        let Some(mut pooled) = self.active.remove(&id) else {
            return false;
        };
        pooled.value.reset();
        self.stats.released += 1;
        if self.total() < self.effective_max() {
            self.available.push(pooled.value);
        } else {
            self.stats.discarded += 1;
        }
        true
    }

    fn preallocate(&mut self, count: usize) {
        let room = self.effective_max().saturating_sub(self.total());
        for _ in 0..count.min(room) {
            self.available.push(T::default());
            self.stats.created += 1;
        }
    }

    fn reclaim_least_recently_used(&mut self) -> T {
        let oldest = self
            .active
            .iter()
            .min_by(|a, b| {
                a.1.meta
                    .last_used_ms
                    .total_cmp(&b.1.meta.last_used_ms)
                    .then(a.0.cmp(b.0))
            })
            .map(|(id, _)| *id);

        match oldest.and_then(|id| self.active.remove(&id)) {
            Some(pooled) => {
                debug!(
                    "{} pool exhausted, recycling object {:?}",
                    self.pool_type.name(),
                    pooled.meta.id
                );
                self.stats.recycled += 1;
                pooled.value
            }
            None => {
                self.stats.created += 1;
                T::default()
            }
        }
    }

    fn grow_if_needed(&mut self) {
        let active = self.active.len();
        let threshold = self.config.initial_size as f32 * 0.8;
        if active > self.high_water && active as f32 > threshold {
            self.high_water = active;
            if self.available.is_empty() {
                self.preallocate(self.config.growth_rate);
            }
        }
    }

    fn shrink_if_underused(&mut self) {
        let total = self.total();
        if total == 0 {
            return;
        }
        let usage = self.active.len() as f32 / total as f32;
        if usage < self.config.shrink_threshold && self.available.len() > self.config.initial_size
        {
            let excess = self.available.len() - self.config.initial_size;
            let keep = self.available.len() - excess / 2;
            self.trim_available(keep);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, Debug, PartialEq)]
    struct Spark {
        energy: u32,
    }

    impl Poolable for Spark {}

    fn small_pool() -> ObjectPool<Spark> {
        ObjectPool::with_config(
            PoolType::Effect,
            PoolConfig {
                initial_size: 4,
                max_size: 8,
                growth_rate: 2,
                shrink_threshold: 0.3,
            },
        )
    }

    #[test]
    fn preallocates_initial_size() {
        let pool = small_pool();
        assert_eq!(pool.available_count(), 4);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.stats().created, 4);
    }

    #[test]
    fn balanced_acquire_release_keeps_available_unchanged() {
        let mut pool = small_pool();
        let before = pool.available_count();
        for i in 0..100 {
            let id = pool.acquire(i as f64);
            assert!(pool.release(id));
        }
        assert_eq!(pool.available_count(), before);
        assert_eq!(pool.stats().reused, 100);
        assert!((pool.stats().reuse_rate() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn acquired_objects_are_reset() {
        let mut pool = small_pool();
        let id = pool.acquire_with(0.0, |spark| spark.energy = 9);
        assert_eq!(pool.get(id), Some(&Spark { energy: 9 }));
        pool.release(id);
        let id = pool.acquire(1.0);
        assert_eq!(pool.get(id), Some(&Spark::default()));
    }

    #[test]
    fn never_exceeds_max_and_recycles_least_recently_used() {
        let mut pool = small_pool();
        let ids: Vec<PoolId> = (0..8).map(|i| pool.acquire(i as f64)).collect();
        assert_eq!(pool.total(), 8);

        pool.touch(ids[0], 100.0);
        let extra = pool.acquire(200.0);
        assert_eq!(pool.active_count(), 8);
        assert!(pool.total() <= 8);
        assert!(pool.contains(ids[0]));
        assert!(!pool.contains(ids[1]), "oldest untouched object is recycled");
        assert!(pool.contains(extra));
        assert_eq!(pool.stats().recycled, 1);
    }

    #[test]
    fn stale_ids_are_ignored() {
        let mut pool = small_pool();
        let id = pool.acquire(0.0);
        assert!(pool.release(id));
        assert!(!pool.release(id));
        assert!(pool.get(id).is_none());
    }

    #[test]
    fn grows_past_high_water_mark() {
        let mut pool = small_pool();
        let _held: Vec<PoolId> = (0..4).map(|i| pool.acquire(i as f64)).collect();
        assert_eq!(pool.available_count(), 2, "grew by growth_rate once exhausted");
        assert_eq!(pool.high_water(), 4);
    }

    #[test]
    fn shrinks_surplus_when_underused() {
        let mut pool = small_pool();
        let ids: Vec<PoolId> = (0..8).map(|i| pool.acquire(i as f64)).collect();
        for id in ids {
            pool.release(id);
        }
        assert!(pool.available_count() < 8);
        assert!(pool.available_count() >= 4);
    }

    #[test]
    fn growth_ceiling_caps_total() {
        let mut pool = small_pool();
        pool.set_growth_ceiling(0.5);
        assert_eq!(pool.effective_max(), 4);
        let _held: Vec<PoolId> = (0..10).map(|i| pool.acquire(i as f64)).collect();
        assert_eq!(pool.total(), 4);
    }

    #[test]
    fn release_oldest_half() {
        let mut pool = small_pool();
        let ids: Vec<PoolId> = (0..6).map(|i| pool.acquire(i as f64)).collect();
        assert_eq!(pool.release_oldest_fraction(0.5), 3);
        assert!(!pool.contains(ids[0]));
        assert!(pool.contains(ids[5]));
    }
}
