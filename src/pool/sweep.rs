//! Periodic memory-pressure sweep over the pool set.
//!
//! Runs between ticks only, roughly every five seconds of simulation time.

use bevy::prelude::*;

use super::pools::ObjectPools;

const MB: u64 = 1024 * 1024;

/// Estimates how much memory the pools hold.
pub trait MemoryProbe: Send + Sync {
    fn estimate_bytes(&self, pools: &ObjectPools) -> u64;
}

/// Object count times a flat per-object footprint.
#[derive(Debug, Clone, Copy)]
pub struct PoolFootprintProbe {
    pub bytes_per_object: u64,
}

impl Default for PoolFootprintProbe {
    fn default() -> Self {
        Self {
            bytes_per_object: 1024,
        }
    }
}

impl MemoryProbe for PoolFootprintProbe {
    fn estimate_bytes(&self, pools: &ObjectPools) -> u64 {
        pools.total_objects() as u64 * self.bytes_per_object
    }
}

/// What a sweep did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    /// Usage under the soft limit
    Normal,
    /// Over the soft limit: available lists trimmed, idle objects released
    Aggressive { released: usize, trimmed: usize },
    /// Over the hard limit: the older half of every pool released
    Emergency { released: usize, trimmed: usize },
}

#[derive(Resource)]
pub struct MemorySweep {
    pub interval_ms: f64,
    pub soft_limit_bytes: u64,
    pub hard_limit_bytes: u64,
    /// Active objects untouched this long are reclaimed by aggressive cleanup
    pub idle_ms: f64,
    last_sweep_ms: f64,
    last_estimate_bytes: u64,
    probe: Box<dyn MemoryProbe>,
}

impl Default for MemorySweep {
    fn default() -> Self {
        Self::with_probe(Box::new(PoolFootprintProbe::default()))
    }
}

impl MemorySweep {
    pub fn with_probe(probe: Box<dyn MemoryProbe>) -> Self {
        Self {
            interval_ms: 5000.0,
            soft_limit_bytes: 100 * MB,
            hard_limit_bytes: 120 * MB,
            idle_ms: 30_000.0,
            last_sweep_ms: 0.0,
            last_estimate_bytes: 0,
            probe,
        }
    }

    pub fn set_probe(&mut self, probe: Box<dyn MemoryProbe>) {
        self.probe = probe;
    }

    pub fn reset(&mut self) {
        self.last_sweep_ms = 0.0;
    }

    pub fn last_estimate_bytes(&self) -> u64 {
        self.last_estimate_bytes
    }

    pub fn last_estimate_mb(&self) -> f32 {
        self.last_estimate_bytes as f32 / MB as f32
    }

    pub fn is_due(&self, now_ms: f64) -> bool {
        now_ms - self.last_sweep_ms >= self.interval_ms
    }

    /// Sweep if the interval has elapsed.
    pub fn maybe_run(&mut self, pools: &mut ObjectPools, now_ms: f64) -> Option<SweepOutcome> {
        if !self.is_due(now_ms) {
            return None;
        }
        Some(self.run(pools, now_ms))
    }

    pub fn run(&mut self, pools: &mut ObjectPools, now_ms: f64) -> SweepOutcome {
        self.last_sweep_ms = now_ms;
        self.last_estimate_bytes = self.probe.estimate_bytes(pools);

        if self.last_estimate_bytes > self.hard_limit_bytes {
            let (released, trimmed) = emergency_cleanup(pools);
            warn!(
                "Pool memory at {:.1} MB, emergency cleanup released {} objects",
                self.last_estimate_mb(),
                released
            );
            self.last_estimate_bytes = self.probe.estimate_bytes(pools);
            SweepOutcome::Emergency { released, trimmed }
        } else if self.last_estimate_bytes > self.soft_limit_bytes {
            let (released, trimmed) = aggressive_cleanup(pools, now_ms, self.idle_ms);
            info!(
                "Pool memory at {:.1} MB, aggressive cleanup trimmed {} objects",
                self.last_estimate_mb(),
                trimmed
            );
            self.last_estimate_bytes = self.probe.estimate_bytes(pools);
            SweepOutcome::Aggressive { released, trimmed }
        } else {
            SweepOutcome::Normal
        }
    }
}

fn aggressive_cleanup(pools: &mut ObjectPools, now_ms: f64, idle_ms: f64) -> (usize, usize) {
    let mut released = 0;
    let mut trimmed = 0;
    for pool in pools.each_mut() {
        let keep = pool.config().initial_size;
        trimmed += pool.trim_available(keep);
        released += pool.release_idle(now_ms, idle_ms);
        pool.record_cleanup();
    }
    (released, trimmed)
}

fn emergency_cleanup(pools: &mut ObjectPools) -> (usize, usize) {
    let mut released = 0;
    let mut trimmed = 0;
    for pool in pools.each_mut() {
        let keep = pool.config().initial_size.min(5);
        released += pool.release_oldest_fraction(0.5);
        trimmed += pool.trim_available(keep);
        pool.record_cleanup();
    }
    (released, trimmed)
}
